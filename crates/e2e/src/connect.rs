//! Connection form model
//!
//! Declarative input to the connect scenarios. Absent fields are
//! skipped during form fill, never defaulted; `goto_schema_window` is
//! the only place the hostname/port defaults apply. The `None` variants
//! of [`AuthCredentials`] and [`SslMode`] are sentinels meaning
//! "feature disabled", distinct from leaving the field out entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Hostname applied by `goto_schema_window` when none is given.
pub const DEFAULT_HOSTNAME: &str = "localhost";

/// Port applied by `goto_schema_window` when none is given.
pub const DEFAULT_PORT: u16 = 27017;

/// A (possibly partial) connection form submission.
///
/// Unknown keys in fixture files are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectRequest {
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub authentication: Option<AuthCredentials>,
    pub ssl: Option<SslSettings>,
}

impl ConnectRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in the top-level connect defaults for fields left blank.
    #[must_use]
    pub fn with_connect_defaults(mut self) -> Self {
        self.hostname.get_or_insert_with(|| DEFAULT_HOSTNAME.to_string());
        self.port.get_or_insert(DEFAULT_PORT);
        self
    }

    /// Parse a request from YAML (fixture files).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Authentication kind, as presented in the form's method dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    None,
    Password,
    Kerberos,
    Ldap,
}

impl AuthMethod {
    /// The option value the form's dropdown uses for this kind.
    pub const fn form_value(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Password => "PASSWORD",
            Self::Kerberos => "KERBEROS",
            Self::Ldap => "LDAP",
        }
    }
}

/// Credentials for one authentication kind.
///
/// Each kind carries exactly the sub-fields its form section shows;
/// the per-kind selector mapping lives in the scenario library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthCredentials {
    None,
    Password {
        username: String,
        password: String,
        #[serde(default)]
        auth_source: Option<String>,
    },
    Kerberos {
        principal: String,
        #[serde(default)]
        service_name: Option<String>,
    },
    Ldap { username: String, password: String },
}

impl AuthCredentials {
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::None => AuthMethod::None,
            Self::Password { .. } => AuthMethod::Password,
            Self::Kerberos { .. } => AuthMethod::Kerberos,
            Self::Ldap { .. } => AuthMethod::Ldap,
        }
    }
}

/// TLS settings section of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SslSettings {
    pub mode: SslMode,
    #[serde(default)]
    pub certificate_authority: Option<String>,
    #[serde(default)]
    pub client_certificate: Option<String>,
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub key_password: Option<String>,
}

/// TLS validation mode, as presented in the form's dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SslMode {
    #[default]
    None,
    Unvalidated,
    Server,
    All,
}

impl SslMode {
    pub const fn form_value(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Unvalidated => "UNVALIDATED",
            Self::Server => "SERVER",
            Self::All => "ALL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_partial_fixture_ignoring_unknown_keys() {
        let yaml = r#"
hostname: db.internal
port: 29000
color: purple
"#;
        let req = ConnectRequest::from_yaml(yaml).unwrap();
        assert_eq!(req.hostname.as_deref(), Some("db.internal"));
        assert_eq!(req.port, Some(29000));
        assert!(req.name.is_none());
        assert!(req.authentication.is_none());
        assert!(req.ssl.is_none());
    }

    #[test]
    fn parses_authentication_by_method_tag() {
        let yaml = r#"
authentication:
  method: PASSWORD
  username: admin
  password: hunter2
"#;
        let req = ConnectRequest::from_yaml(yaml).unwrap();
        let auth = req.authentication.unwrap();
        assert_eq!(auth.method(), AuthMethod::Password);
        assert_eq!(
            auth,
            AuthCredentials::Password {
                username: "admin".to_string(),
                password: "hunter2".to_string(),
                auth_source: None,
            }
        );
    }

    #[test]
    fn sentinel_none_is_distinct_from_absent() {
        let yaml = r#"
authentication:
  method: NONE
ssl:
  mode: NONE
"#;
        let req = ConnectRequest::from_yaml(yaml).unwrap();
        assert_eq!(req.authentication, Some(AuthCredentials::None));
        assert_eq!(req.ssl.unwrap().mode, SslMode::None);

        let empty = ConnectRequest::from_yaml("{}").unwrap();
        assert!(empty.authentication.is_none());
        assert!(empty.ssl.is_none());
    }

    #[test]
    fn connect_defaults_fill_only_blank_fields() {
        let req = ConnectRequest {
            port: Some(29017),
            ..Default::default()
        }
        .with_connect_defaults();
        assert_eq!(req.hostname.as_deref(), Some(DEFAULT_HOSTNAME));
        assert_eq!(req.port, Some(29017));
    }
}
