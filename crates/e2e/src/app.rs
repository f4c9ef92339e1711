//! Application lifecycle - launching and tearing down the Datascope
//! desktop client around a test suite

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use datascope_driver::{RemoteClient, Session};

use crate::error::{HarnessError, Result};

/// Handle to a running Datascope instance.
#[derive(Debug)]
pub struct AppHandle {
    child: Child,
    pub control_url: String,
    pub port: u16,
}

impl AppHandle {
    /// Launch the application from a built bundle and wait until its
    /// control endpoint answers.
    pub async fn launch(config: LaunchConfig) -> Result<Self> {
        let binary = match &config.binary {
            Some(path) => path.clone(),
            None => resolve_binary(&config.dist_dir)?,
        };
        let port = config.control_port.unwrap_or_else(find_free_port);
        let control_url = format!("http://127.0.0.1:{}", port);

        info!("launching {} (control port {})", binary.display(), port);

        let mut cmd = Command::new(&binary);
        cmd.env("DATASCOPE_CONTROL_PORT", port.to_string())
            .env("DATASCOPE_CONTROL_HOST", "127.0.0.1");

        if config.test_mode {
            cmd.env("DATASCOPE_E2E_TEST_MODE", "1");
        }
        for (key, value) in &config.extra_env {
            cmd.env(key, value);
        }

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            HarnessError::Spawn(format!("{}: {}", binary.display(), e))
        })?;

        let handle = AppHandle {
            child,
            control_url: control_url.clone(),
            port,
        };

        handle.wait_for_ready(config.startup_timeout).await?;

        info!("application ready at {}", control_url);
        Ok(handle)
    }

    /// Poll the control endpoint until it answers.
    async fn wait_for_ready(&self, timeout: Duration) -> Result<()> {
        let status_url = format!("{}/session/status", self.control_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("control endpoint returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("waiting for application to start...");
                    }
                    // Connection refused is expected while the app boots
                    if !e.is_connect() {
                        warn!("control endpoint error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(HarnessError::StartupTimeout { attempts })
    }

    /// Wrap a transport speaking to this instance in a session.
    pub fn attach(&self, client: Arc<dyn RemoteClient>) -> Session {
        Session::new(client)
    }

    /// Whether the application process is still alive.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Stop the application.
    pub fn stop(&mut self) -> Result<()> {
        info!("stopping application (pid: {})", self.child.id());

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                // Give it a moment to shut down gracefully
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        // Force kill if still running
        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for AppHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Configuration for launching the application under test
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Directory containing the built desktop bundle
    pub dist_dir: PathBuf,

    /// Explicit binary path, overriding resolution under `dist_dir`
    pub binary: Option<PathBuf>,

    /// Control port to listen on (None = find free port)
    pub control_port: Option<u16>,

    /// Timeout for application startup
    pub startup_timeout: Duration,

    /// Extra environment variables for the application process
    pub extra_env: Vec<(String, String)>,

    /// Enable test mode (mock data, shortened animations)
    pub test_mode: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            binary: None,
            control_port: None,
            startup_timeout: Duration::from_secs(30),
            extra_env: Vec::new(),
            test_mode: true,
        }
    }
}

/// Launch the application from `dist_dir` with default settings.
///
/// The intended entry point for suite setup hooks.
pub async fn start_application(dist_dir: impl Into<PathBuf>) -> Result<AppHandle> {
    AppHandle::launch(LaunchConfig {
        dist_dir: dist_dir.into(),
        ..Default::default()
    })
    .await
}

/// Tear down an application started by [`start_application`].
///
/// The intended exit point for suite teardown hooks.
pub fn stop_application(mut app: AppHandle) -> Result<()> {
    app.stop()
}

/// Locate the packaged executable under the dist directory.
///
/// Fails before any automation starts when the bundle has not been
/// built.
fn resolve_binary(dist_dir: &Path) -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    const CANDIDATES: &[&str] = &["Datascope.app/Contents/MacOS/Datascope"];
    #[cfg(target_os = "windows")]
    const CANDIDATES: &[&str] = &["Datascope.exe", "datascope.exe"];
    #[cfg(all(unix, not(target_os = "macos")))]
    const CANDIDATES: &[&str] = &["datascope", "Datascope"];

    for candidate in CANDIDATES {
        let path = dist_dir.join(candidate);
        if path.is_file() {
            return Ok(path);
        }
    }

    Err(HarnessError::AppNotBuilt {
        dist_dir: dist_dir.to_path_buf(),
    })
}

/// Find a free port to use
fn find_free_port() -> u16 {
    use std::net::TcpListener;

    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to find free port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}
