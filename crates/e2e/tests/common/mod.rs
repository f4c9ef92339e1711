//! Shared fixtures for the harness integration tests

use std::sync::Arc;

use datascope_driver::testkit::{ElementState, MockClient};
use datascope_driver::{Session, WaitOptions};
use datascope_e2e::scenarios::sel;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Tight budgets so failing waits surface quickly.
pub fn fast() -> WaitOptions {
    WaitOptions::new().with_timeout_ms(1_000).with_interval_ms(10)
}

/// A mock UI showing the connect window with every form element attached.
pub fn connect_ui() -> (MockClient, Session) {
    let client = MockClient::new();
    client.set_element(sel::CONNECT_FORM, ElementState::visible());
    for selector in [
        sel::HOSTNAME,
        sel::PORT,
        sel::CONNECTION_NAME,
        sel::AUTH_METHOD,
        sel::AUTH_USERNAME,
        sel::AUTH_PASSWORD,
        sel::AUTH_SOURCE,
        sel::KERBEROS_PRINCIPAL,
        sel::KERBEROS_SERVICE_NAME,
        sel::LDAP_USERNAME,
        sel::LDAP_PASSWORD,
        sel::SSL_METHOD,
        sel::SSL_CERTIFICATE_AUTHORITY,
        sel::SSL_CLIENT_CERTIFICATE,
        sel::SSL_CLIENT_KEY,
        sel::SSL_KEY_PASSWORD,
        sel::CONNECT_BUTTON,
    ] {
        client.set_element(selector, ElementState::visible());
    }

    let session = Session::new(Arc::new(client.clone()));
    (client, session)
}

/// A mock UI showing the schema window: idle status bar, sidebar, and
/// sample view controls.
pub fn schema_ui(collections: &[&str]) -> (MockClient, Session) {
    let client = MockClient::new();
    client.set_element(sel::STATUS_BAR, ElementState::hidden());
    client.set_element(sel::DOCUMENT_LIST, ElementState::visible());
    client.set_element(sel::REFINE_INPUT, ElementState::visible());
    client.set_element(sel::REFINE_APPLY, ElementState::visible());
    client.set_element(sel::REFINE_RESET, ElementState::visible());
    for title in collections {
        client.set_element(&sel::sidebar_collection(title), ElementState::visible());
    }

    let session = Session::new(Arc::new(client.clone()));
    (client, session)
}
