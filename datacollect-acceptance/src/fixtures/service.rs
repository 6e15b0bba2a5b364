use std::process::Stdio;
use std::time::Duration;

use datacollect_sdk::{DataCollectClient, Method};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::ServiceSettings;
use crate::error::{HarnessError, HarnessResult};

/// The service under test.
///
/// When a start command is configured and nothing answers on the health
/// endpoint yet, the fixture launches the command and owns the process.
/// An instance that is already healthy is reused as is.
#[derive(Debug)]
pub struct ServiceFixture {
    settings: ServiceSettings,
    child: Mutex<Option<Child>>,
}

impl ServiceFixture {
    /// Make sure the service answers, launching it if configured to.
    pub async fn start(settings: ServiceSettings, client: &DataCollectClient) -> HarnessResult<Self> {
        let fixture = Self {
            settings,
            child: Mutex::new(None),
        };

        if fixture.is_healthy(client).await {
            info!(url = %client.base_url(), "Attaching to running service");
            return Ok(fixture);
        }

        if let Some(program) = &fixture.settings.start_command {
            info!(program = %program, args = ?fixture.settings.start_args, "Launching service");
            let mut command = Command::new(program);
            command
                .args(&fixture.settings.start_args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true);
            if let Some(dir) = &fixture.settings.working_dir {
                command.current_dir(dir);
            }
            *fixture.child.lock().await = Some(command.spawn()?);
        }

        fixture.wait_until_healthy(client).await?;
        Ok(fixture)
    }

    /// True when this fixture launched the process it is serving.
    pub async fn is_managed(&self) -> bool {
        self.child.lock().await.is_some()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub async fn is_healthy(&self, client: &DataCollectClient) -> bool {
        match client
            .http_client()
            .send_raw::<()>(Method::GET, &self.settings.health_path, None)
            .await
        {
            Ok(response) if response.is_success() => true,
            Ok(response) => {
                debug!(status = %response.status, "Health check not ready");
                false
            }
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    /// Poll the health endpoint until it answers 2xx or the startup timeout
    /// runs out.
    pub async fn wait_until_healthy(&self, client: &DataCollectClient) -> HarnessResult<()> {
        let timeout = self.settings.startup_timeout();
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_healthy(client).await {
                info!(url = %client.base_url(), "Service is healthy");
                return Ok(());
            }
            if Instant::now() >= deadline {
                warn!(?timeout, "Service did not come up");
                return Err(HarnessError::StartupTimeout(timeout));
            }
            sleep(self.settings.poll_interval()).await;
        }
    }

    /// Stop the service: run the stop command if there is one, then kill the
    /// launched process if it is still alive.
    pub async fn shutdown(&self) -> HarnessResult<()> {
        if let Some(program) = &self.settings.stop_command {
            info!(program = %program, "Stopping service");
            let status = Command::new(program)
                .args(&self.settings.stop_args)
                .status()
                .await?;
            if !status.success() {
                warn!(%status, "Stop command failed");
            }
        }

        let child = self.child.lock().await.take();
        if let Some(mut child) = child {
            if child.try_wait()?.is_none() {
                info!(pid = ?child.id(), "Killing service process");
                child.start_kill()?;
                reap(&mut child).await?;
            }
        }
        Ok(())
    }
}

/// Wait for a killed child to exit.
///
/// The child may have been spawned on another test's runtime, whose driver
/// is gone by now, so this polls `try_wait` instead of awaiting `wait`.
async fn reap(child: &mut Child) -> HarnessResult<()> {
    let deadline = Instant::now() + REAP_TIMEOUT;
    while child.try_wait()?.is_none() {
        if Instant::now() >= deadline {
            warn!(pid = ?child.id(), "Service process still running after kill");
            break;
        }
        sleep(REAP_POLL).await;
    }
    Ok(())
}

const REAP_TIMEOUT: Duration = Duration::from_secs(5);
const REAP_POLL: Duration = Duration::from_millis(20);

impl Drop for ServiceFixture {
    fn drop(&mut self) {
        if let Some(child) = self.child.get_mut() {
            if let Err(e) = child.start_kill() {
                warn!(error = %e, "Failed to stop service");
            }
        }
    }
}
