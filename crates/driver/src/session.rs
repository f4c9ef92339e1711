//! Session: the chain context
//!
//! Owns the remote client handle and the command registry, and exposes
//! the composition surface scenario code works against: facade
//! passthroughs, wait helpers, sequence execution, and named-command
//! invocation. One session drives one application instance; commands are
//! causally chained, never concurrent within a scenario.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::client::{RemoteClient, WindowHandle};
use crate::error::{Error, Result};
use crate::registry::{CommandArgs, CommandRegistry};
use crate::sequence::{Sequence, StepAction};
use crate::wait::{wait_until, WaitOptions};
use crate::window;

pub struct Session {
    client: Arc<dyn RemoteClient>,
    commands: CommandRegistry,
}

impl Session {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            client,
            commands: CommandRegistry::new(),
        }
    }

    pub fn client(&self) -> &dyn RemoteClient {
        self.client.as_ref()
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Invoke a registered command with the session as chain context.
    ///
    /// The handler is resolved at call time, so the latest registration
    /// under `name` wins. Handlers may themselves call `invoke`.
    pub async fn invoke(&self, name: &str, args: CommandArgs) -> Result<Value> {
        let (arity, handler) = self
            .commands
            .get(name)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
        if args.len() < arity {
            return Err(Error::Arity {
                name: name.to_string(),
                expected: arity,
                got: args.len(),
            });
        }
        debug!(command = name, "invoking command");
        handler(self, args).await
    }

    // Facade passthroughs

    pub async fn click(&self, selector: &str) -> Result<()> {
        self.client.click(selector).await
    }

    pub async fn set_value(&self, selector: &str, value: &str) -> Result<()> {
        self.client.set_value(selector, value).await
    }

    pub async fn select_by_value(&self, selector: &str, value: &str) -> Result<()> {
        self.client.select_by_value(selector, value).await
    }

    pub async fn get_text(&self, selector: &str) -> Result<String> {
        self.client.get_text(selector).await
    }

    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.client.is_visible(selector).await
    }

    pub async fn exists(&self, selector: &str) -> Result<bool> {
        self.client.exists(selector).await
    }

    pub async fn window_handle(&self) -> Result<WindowHandle> {
        self.client.window_handle().await
    }

    pub async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        self.client.window_handles().await
    }

    pub async fn switch_to_window(&self, index: usize) -> Result<()> {
        self.client.switch_to_window(index).await
    }

    // Wait helpers

    /// Wait for the element to become visible, or hidden with `reverse`.
    pub async fn wait_for_visible(
        &self,
        selector: &str,
        opts: &WaitOptions,
        reverse: bool,
    ) -> Result<()> {
        let label = if reverse {
            format!("{selector} to become hidden")
        } else {
            format!("{selector} to become visible")
        };
        wait_until(&label, opts, || async move {
            Ok(self.client.is_visible(selector).await? != reverse)
        })
        .await?;
        Ok(())
    }

    /// Wait for an element matching `selector` to be attached.
    pub async fn wait_for_exist(&self, selector: &str, opts: &WaitOptions) -> Result<()> {
        let label = format!("{selector} to exist");
        wait_until(&label, opts, || async move {
            self.client.exists(selector).await
        })
        .await?;
        Ok(())
    }

    /// Wait for the element's text content to equal `expected`.
    pub async fn wait_for_text(
        &self,
        selector: &str,
        expected: &str,
        opts: &WaitOptions,
    ) -> Result<()> {
        let label = format!("text of {selector} to equal {expected:?}");
        wait_until(&label, opts, || async move {
            Ok(self.client.get_text(selector).await? == expected)
        })
        .await?;
        Ok(())
    }

    /// Wait for a new window at `index` and switch to it.
    pub async fn wait_for_window(&self, index: usize, opts: &WaitOptions) -> Result<WindowHandle> {
        window::wait_for_window(self.client.as_ref(), index, opts).await
    }

    // Sequencing

    /// Execute the chain strictly in order, each step beginning only
    /// after the prior resolved. The first failure aborts the remainder
    /// and propagates unmodified.
    pub async fn run_sequence(&self, seq: &Sequence) -> Result<()> {
        for step in seq {
            debug!(step = %step.step_name(), "running step");
            self.run_step(step).await?;
        }
        Ok(())
    }

    async fn run_step(&self, step: &StepAction) -> Result<()> {
        match step {
            StepAction::Click { selector } => self.client.click(selector).await,
            StepAction::SetValue { selector, value } => {
                self.client.set_value(selector, value).await
            }
            StepAction::SelectByValue { selector, value } => {
                self.client.select_by_value(selector, value).await
            }
            StepAction::WaitForVisible {
                selector,
                reverse,
                timeout_ms,
            } => {
                self.wait_for_visible(selector, &step_opts(timeout_ms), *reverse)
                    .await
            }
            StepAction::WaitForExist {
                selector,
                timeout_ms,
            } => self.wait_for_exist(selector, &step_opts(timeout_ms)).await,
            StepAction::WaitForEmptyText {
                selector,
                timeout_ms,
            } => {
                self.wait_for_text(selector, "", &step_opts(timeout_ms))
                    .await
            }
        }
    }
}

fn step_opts(timeout_ms: &Option<u64>) -> WaitOptions {
    match timeout_ms {
        Some(ms) => WaitOptions::default().with_timeout_ms(*ms),
        None => WaitOptions::default(),
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandFuture;
    use crate::testkit::{ElementState, MockClient, RecordedCall};
    use serde_json::json;

    fn session() -> (MockClient, Session) {
        let client = MockClient::new();
        let session = Session::new(Arc::new(client.clone()));
        (client, session)
    }

    #[tokio::test]
    async fn invoke_rejects_unknown_names() {
        let (_, session) = session();
        let err = session.invoke("does_not_exist", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(name) if name == "does_not_exist"));
    }

    #[tokio::test]
    async fn invoke_enforces_declared_arity() {
        let (_, session) = session();
        fn echo(_s: &Session, args: CommandArgs) -> CommandFuture<'_> {
            Box::pin(async move { Ok(args.into_iter().next().unwrap_or(Value::Null)) })
        }
        session.commands().register("echo", 1, echo);

        let err = session.invoke("echo", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::Arity { expected: 1, got: 0, .. }));

        let value = session.invoke("echo", vec![json!("hi")]).await.unwrap();
        assert_eq!(value, json!("hi"));
    }

    #[tokio::test]
    async fn last_registration_wins() {
        let (_, session) = session();
        fn first(_s: &Session, _args: CommandArgs) -> CommandFuture<'_> {
            Box::pin(async { Ok(json!("first")) })
        }
        fn second(_s: &Session, _args: CommandArgs) -> CommandFuture<'_> {
            Box::pin(async { Ok(json!("second")) })
        }
        session.commands().register("probe", 0, first);
        session.commands().register("probe", 0, second);

        let value = session.invoke("probe", vec![]).await.unwrap();
        assert_eq!(value, json!("second"));
    }

    #[tokio::test]
    async fn commands_can_invoke_other_commands() {
        let (client, session) = session();
        client.set_element("#go", ElementState::visible());

        fn press(s: &Session, _args: CommandArgs) -> CommandFuture<'_> {
            Box::pin(async move {
                s.click("#go").await?;
                Ok(Value::Null)
            })
        }
        fn press_twice(s: &Session, _args: CommandArgs) -> CommandFuture<'_> {
            Box::pin(async move {
                s.invoke("press", vec![]).await?;
                s.invoke("press", vec![]).await?;
                Ok(Value::Null)
            })
        }
        session.commands().register("press", 0, press);
        session.commands().register("press_twice", 0, press_twice);

        session.invoke("press_twice", vec![]).await.unwrap();
        assert_eq!(
            client.calls(),
            vec![
                RecordedCall::Click("#go".to_string()),
                RecordedCall::Click("#go".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn sequences_fail_fast_and_preserve_order() {
        let (client, session) = session();
        client.set_element("#first", ElementState::visible());
        client.set_element("#third", ElementState::visible());
        // "#second" is never attached, so its click fails.

        let seq = Sequence::new()
            .push(StepAction::click("#first"))
            .push(StepAction::click("#second"))
            .push(StepAction::click("#third"));

        let err = session.run_sequence(&seq).await.unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(client.calls(), vec![RecordedCall::Click("#first".to_string())]);
    }
}
