//! Scenario library
//!
//! Pre-built interaction flows for the Datascope UI, composed from the
//! driver's wait engine and command sequencer. Every flow exists both as
//! a plain async function over [`Session`] and as a registered named
//! command (see [`register_commands`]), so suites can call either
//! surface.
//!
//! Flows that act on the sample view first wait for the status bar to
//! clear; the bar stays visible while an operation is in flight.

use serde_json::Value;
use tracing::debug;

use datascope_driver::registry::{CommandArgs, CommandFuture};
use datascope_driver::{Result, Sequence, Session, StepAction, WaitOptions, WindowHandle};

use crate::connect::{AuthCredentials, AuthMethod, ConnectRequest, SslMode};

/// Selectors the Datascope UI exposes for automation.
pub mod sel {
    pub const CONNECT_FORM: &str = "[data-testid=\"connect-form\"]";
    pub const HOSTNAME: &str = "input[name=\"hostname\"]";
    pub const PORT: &str = "input[name=\"port\"]";
    pub const CONNECTION_NAME: &str = "input[name=\"name\"]";

    pub const AUTH_METHOD: &str = "select[name=\"authentication\"]";
    pub const AUTH_USERNAME: &str = "input[name=\"auth-username\"]";
    pub const AUTH_PASSWORD: &str = "input[name=\"auth-password\"]";
    pub const AUTH_SOURCE: &str = "input[name=\"auth-source\"]";
    pub const KERBEROS_PRINCIPAL: &str = "input[name=\"kerberos-principal\"]";
    pub const KERBEROS_SERVICE_NAME: &str = "input[name=\"kerberos-service-name\"]";
    pub const LDAP_USERNAME: &str = "input[name=\"ldap-username\"]";
    pub const LDAP_PASSWORD: &str = "input[name=\"ldap-password\"]";

    pub const SSL_METHOD: &str = "select[name=\"ssl\"]";
    pub const SSL_CERTIFICATE_AUTHORITY: &str = "input[name=\"ssl-ca\"]";
    pub const SSL_CLIENT_CERTIFICATE: &str = "input[name=\"ssl-certificate\"]";
    pub const SSL_CLIENT_KEY: &str = "input[name=\"ssl-private-key\"]";
    pub const SSL_KEY_PASSWORD: &str = "input[name=\"ssl-key-password\"]";

    pub const CONNECT_BUTTON: &str = "button[name=\"connect\"]";

    pub const STATUS_BAR: &str = "[data-testid=\"status-bar\"]";
    pub const DOCUMENT_LIST: &str = "[data-testid=\"document-list\"]";
    pub const REFINE_INPUT: &str = "input[data-testid=\"refine-input\"]";
    pub const REFINE_APPLY: &str = "[data-testid=\"refine-apply\"]";
    pub const REFINE_RESET: &str = "[data-testid=\"refine-reset\"]";

    pub const HELP_FILTER: &str = "input[data-testid=\"help-filter\"]";

    pub const TOUR_OVERLAY: &str = "[data-testid=\"feature-tour\"]";
    pub const TOUR_NEXT: &str = "[data-testid=\"feature-tour-next\"]";
    pub const TOUR_FINISH: &str = "[data-testid=\"feature-tour-finish\"]";

    /// Suffix the sidebar appends to system collection titles.
    pub const INTERNAL_COLLECTION_SUFFIX: &str = " (internal collection)";

    /// Sidebar entry whose title attribute equals `title` exactly.
    pub fn sidebar_collection(title: &str) -> String {
        format!("[data-testid=\"sidebar-collection\"][title=\"{title}\"]")
    }
}

/// Wait for the status bar (busy indicator) to clear.
///
/// The shared precondition of every sample-view flow.
pub async fn wait_for_status_clear(session: &Session, opts: &WaitOptions) -> Result<()> {
    session.wait_for_visible(sel::STATUS_BAR, opts, true).await
}

/// Fill the connect form with whatever the request carries.
///
/// Issues one `set_value` per present static field; selects and fills
/// the authentication section only when credentials are present and the
/// method is not the disabled sentinel, and likewise for the TLS
/// section. Absent fields leave the form untouched.
pub async fn fill_out_form(session: &Session, req: &ConnectRequest) -> Result<()> {
    let port = req.port.map(|p| p.to_string());
    let mut seq = Sequence::new()
        .set_value_opt(sel::HOSTNAME, req.hostname.as_deref())
        .set_value_opt(sel::PORT, port.as_deref())
        .set_value_opt(sel::CONNECTION_NAME, req.name.as_deref());

    if let Some(auth) = &req.authentication {
        if auth.method() != AuthMethod::None {
            seq = seq.push(StepAction::select_by_value(
                sel::AUTH_METHOD,
                auth.method().form_value(),
            ));
        }
        seq = match auth {
            AuthCredentials::None => seq,
            AuthCredentials::Password {
                username,
                password,
                auth_source,
            } => seq
                .push(StepAction::set_value(sel::AUTH_USERNAME, username))
                .push(StepAction::set_value(sel::AUTH_PASSWORD, password))
                .set_value_opt(sel::AUTH_SOURCE, auth_source.as_deref()),
            AuthCredentials::Kerberos {
                principal,
                service_name,
            } => seq
                .push(StepAction::set_value(sel::KERBEROS_PRINCIPAL, principal))
                .set_value_opt(sel::KERBEROS_SERVICE_NAME, service_name.as_deref()),
            AuthCredentials::Ldap { username, password } => seq
                .push(StepAction::set_value(sel::LDAP_USERNAME, username))
                .push(StepAction::set_value(sel::LDAP_PASSWORD, password)),
        };
    }

    if let Some(ssl) = &req.ssl {
        if ssl.mode != SslMode::None {
            seq = seq
                .push(StepAction::select_by_value(
                    sel::SSL_METHOD,
                    ssl.mode.form_value(),
                ))
                .set_value_opt(
                    sel::SSL_CERTIFICATE_AUTHORITY,
                    ssl.certificate_authority.as_deref(),
                )
                .set_value_opt(
                    sel::SSL_CLIENT_CERTIFICATE,
                    ssl.client_certificate.as_deref(),
                )
                .set_value_opt(sel::SSL_CLIENT_KEY, ssl.client_key.as_deref())
                .set_value_opt(sel::SSL_KEY_PASSWORD, ssl.key_password.as_deref());
        }
    }

    debug!(steps = seq.len(), "filling connect form");
    session.run_sequence(&seq).await
}

/// Submit the connect form.
pub async fn click_connect(session: &Session) -> Result<()> {
    session.click(sel::CONNECT_BUTTON).await
}

/// Wait for the schema window to replace the connect window at slot 0.
pub async fn wait_for_schema_window(
    session: &Session,
    opts: &WaitOptions,
) -> Result<WindowHandle> {
    session.wait_for_window(0, opts).await
}

/// Wait for the help dialog window (slot 1) and its filter input.
pub async fn wait_for_help_dialog(session: &Session, opts: &WaitOptions) -> Result<WindowHandle> {
    let handle = session.wait_for_window(1, opts).await?;
    session.wait_for_visible(sel::HELP_FILTER, opts, false).await?;
    Ok(handle)
}

/// Narrow the help topic list to entries matching `topic`.
pub async fn filter_help_topics(session: &Session, topic: &str) -> Result<()> {
    let opts = WaitOptions::default();
    session.wait_for_visible(sel::HELP_FILTER, &opts, false).await?;
    session.set_value(sel::HELP_FILTER, topic).await
}

/// Click through the first-run feature tour and wait for its overlay to
/// drain. The overlay is gone once its polled text is exactly empty.
pub async fn complete_feature_tour(session: &Session) -> Result<()> {
    let seq = Sequence::new()
        .push(StepAction::click(sel::TOUR_NEXT))
        .push(StepAction::click(sel::TOUR_NEXT))
        .push(StepAction::click(sel::TOUR_NEXT))
        .push(StepAction::click(sel::TOUR_FINISH))
        .push(StepAction::wait_for_empty_text(sel::TOUR_OVERLAY));
    session.run_sequence(&seq).await
}

/// Connect with defaults applied and land in the schema window.
///
/// Blank hostname/port fall back to `localhost:27017`; everything else
/// in the request is taken as-is.
pub async fn goto_schema_window(
    session: &Session,
    req: &ConnectRequest,
    opts: &WaitOptions,
) -> Result<WindowHandle> {
    let req = req.clone().with_connect_defaults();
    session.wait_for_visible(sel::CONNECT_FORM, opts, false).await?;
    fill_out_form(session, &req).await?;
    click_connect(session).await?;
    wait_for_schema_window(session, opts).await
}

/// Open the named collection from the sidebar.
pub async fn select_collection(session: &Session, name: &str) -> Result<()> {
    let opts = WaitOptions::default();
    wait_for_status_clear(session, &opts).await?;

    let item = sel::sidebar_collection(name);
    session.wait_for_visible(&item, &opts, false).await?;
    session.click(&item).await?;
    session.wait_for_visible(sel::DOCUMENT_LIST, &opts, false).await
}

/// Wait for the sample document list to be ready for inspection.
pub async fn view_sample_documents(session: &Session) -> Result<()> {
    let opts = WaitOptions::default();
    wait_for_status_clear(session, &opts).await?;
    session.wait_for_visible(sel::DOCUMENT_LIST, &opts, false).await
}

/// Apply a filter query to the sample view.
pub async fn refine_sample(session: &Session, query: &str) -> Result<()> {
    let opts = WaitOptions::default();
    wait_for_status_clear(session, &opts).await?;
    session.set_value(sel::REFINE_INPUT, query).await?;
    session.click(sel::REFINE_APPLY).await
}

/// Clear the sample view's filter.
pub async fn reset_sample(session: &Session) -> Result<()> {
    let opts = WaitOptions::default();
    wait_for_status_clear(session, &opts).await?;
    session.click(sel::REFINE_RESET).await
}

/// Click a collection and watch a full sampling round-trip: the status
/// bar must be seen busy and then clear again before this resolves.
///
/// System collections are listed under a decorated title; `internal`
/// appends that suffix before matching.
pub async fn sample_collection(
    session: &Session,
    name: &str,
    internal: bool,
    opts: &WaitOptions,
) -> Result<()> {
    let display = if internal {
        format!("{name}{}", sel::INTERNAL_COLLECTION_SUFFIX)
    } else {
        name.to_string()
    };

    session.click(&sel::sidebar_collection(&display)).await?;
    session.wait_for_visible(sel::STATUS_BAR, opts, false).await?;
    session.wait_for_visible(sel::STATUS_BAR, opts, true).await
}

/// Register the scenario catalogue on the session's command registry.
///
/// Safe to call once per test file; calling again simply replaces the
/// definitions (last registration wins).
pub fn register_commands(session: &Session) {
    let commands = session.commands();
    commands.register("fill_out_form", 1, cmd_fill_out_form);
    commands.register("click_connect", 0, cmd_click_connect);
    commands.register("wait_for_schema_window", 0, cmd_wait_for_schema_window);
    commands.register("wait_for_help_dialog", 0, cmd_wait_for_help_dialog);
    commands.register("filter_help_topics", 1, cmd_filter_help_topics);
    commands.register("complete_feature_tour", 0, cmd_complete_feature_tour);
    commands.register("goto_schema_window", 1, cmd_goto_schema_window);
    commands.register("select_collection", 1, cmd_select_collection);
    commands.register("view_sample_documents", 0, cmd_view_sample_documents);
    commands.register("refine_sample", 1, cmd_refine_sample);
    commands.register("reset_sample", 0, cmd_reset_sample);
    commands.register("sample_collection", 2, cmd_sample_collection);
    debug!(commands = commands.names().len(), "scenario commands registered");
}

// Named-command wrappers. Arguments are JSON values; optional trailing
// timeout_ms arguments override the default wait budget.

fn arg_model(args: &[Value], index: usize) -> Result<ConnectRequest> {
    Ok(serde_json::from_value(
        args.get(index).cloned().unwrap_or(Value::Null),
    )?)
}

fn arg_string(args: &[Value], index: usize) -> Result<String> {
    Ok(serde_json::from_value(
        args.get(index).cloned().unwrap_or(Value::Null),
    )?)
}

fn arg_bool(args: &[Value], index: usize) -> Result<bool> {
    Ok(serde_json::from_value(
        args.get(index).cloned().unwrap_or(Value::Null),
    )?)
}

// Optional trailing [timeout_ms, interval_ms] pair.
fn arg_wait_opts(args: &[Value], index: usize) -> Result<WaitOptions> {
    let mut opts = WaitOptions::default();
    if let Some(value) = args.get(index) {
        let ms: u64 = serde_json::from_value(value.clone())?;
        opts = opts.with_timeout_ms(ms);
    }
    if let Some(value) = args.get(index + 1) {
        let ms: u64 = serde_json::from_value(value.clone())?;
        opts = opts.with_interval_ms(ms);
    }
    Ok(opts)
}

fn cmd_fill_out_form(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let req = arg_model(&args, 0)?;
        fill_out_form(session, &req).await?;
        Ok(Value::Null)
    })
}

fn cmd_click_connect(session: &Session, _args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        click_connect(session).await?;
        Ok(Value::Null)
    })
}

fn cmd_wait_for_schema_window(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let opts = arg_wait_opts(&args, 0)?;
        let handle = wait_for_schema_window(session, &opts).await?;
        Ok(Value::String(handle.to_string()))
    })
}

fn cmd_wait_for_help_dialog(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let opts = arg_wait_opts(&args, 0)?;
        let handle = wait_for_help_dialog(session, &opts).await?;
        Ok(Value::String(handle.to_string()))
    })
}

fn cmd_filter_help_topics(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let topic = arg_string(&args, 0)?;
        filter_help_topics(session, &topic).await?;
        Ok(Value::Null)
    })
}

fn cmd_complete_feature_tour(session: &Session, _args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        complete_feature_tour(session).await?;
        Ok(Value::Null)
    })
}

fn cmd_goto_schema_window(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let req = arg_model(&args, 0)?;
        let opts = arg_wait_opts(&args, 1)?;
        let handle = goto_schema_window(session, &req, &opts).await?;
        Ok(Value::String(handle.to_string()))
    })
}

fn cmd_select_collection(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let name = arg_string(&args, 0)?;
        select_collection(session, &name).await?;
        Ok(Value::Null)
    })
}

fn cmd_view_sample_documents(session: &Session, _args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        view_sample_documents(session).await?;
        Ok(Value::Null)
    })
}

fn cmd_refine_sample(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let query = arg_string(&args, 0)?;
        refine_sample(session, &query).await?;
        Ok(Value::Null)
    })
}

fn cmd_reset_sample(session: &Session, _args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        reset_sample(session).await?;
        Ok(Value::Null)
    })
}

fn cmd_sample_collection(session: &Session, args: CommandArgs) -> CommandFuture<'_> {
    Box::pin(async move {
        let name = arg_string(&args, 0)?;
        let internal = arg_bool(&args, 1)?;
        let opts = arg_wait_opts(&args, 2)?;
        sample_collection(session, &name, internal, &opts).await?;
        Ok(Value::Null)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_wait_arguments_override_the_defaults() {
        let args = vec![Value::Null, serde_json::json!(5000), serde_json::json!(250)];
        let opts = arg_wait_opts(&args, 1).unwrap();
        assert_eq!(opts.timeout, std::time::Duration::from_millis(5000));
        assert_eq!(opts.interval, std::time::Duration::from_millis(250));

        let opts = arg_wait_opts(&[], 0).unwrap();
        assert_eq!(opts.timeout, std::time::Duration::from_millis(10_000));
    }

    #[test]
    fn sidebar_selector_matches_titles_exactly() {
        assert_eq!(
            sel::sidebar_collection("local.startup_log (internal collection)"),
            "[data-testid=\"sidebar-collection\"][title=\"local.startup_log (internal collection)\"]"
        );
    }
}
