//! Application lifecycle entry points

use datascope_e2e::{start_application, HarnessError};

#[tokio::test]
async fn start_application_fails_fast_when_the_bundle_is_missing() {
    let dist = tempfile::tempdir().unwrap();

    let err = start_application(dist.path()).await.unwrap_err();
    match err {
        HarnessError::AppNotBuilt { dist_dir } => {
            assert_eq!(dist_dir, dist.path());
        }
        other => panic!("expected AppNotBuilt, got {other}"),
    }
    // The remediation hint points at the missing build step.
    let dist2 = tempfile::tempdir().unwrap();
    let message = start_application(dist2.path())
        .await
        .unwrap_err()
        .to_string();
    assert!(message.contains("build the desktop bundle"));
}
