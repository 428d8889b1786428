//! Docker-backed `ContainerManager`.
//!
//! Tool-server containers are started with the `mcp-anywhere.managed=true`
//! label. Teardown removes every container carrying it.

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{CommandRunner, ContainerManager, ReleaseReport};

/// Label carried by every container this gateway starts.
pub const MANAGED_LABEL: &str = "mcp-anywhere.managed=true";

pub struct DockerContainerManager<R> {
    runner: R,
}

impl<R: CommandRunner> DockerContainerManager<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn managed_ids(&self) -> Result<Vec<String>> {
        let filter = format!("label={MANAGED_LABEL}");
        let output = self
            .runner
            .run("docker", &["ps", "-aq", "--filter", &filter])
            .await
            .context("listing managed containers")?;
        anyhow::ensure!(
            output.status.success(),
            "docker ps failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(parse_ids(&output.stdout))
    }
}

impl<R: CommandRunner> ContainerManager for DockerContainerManager<R> {
    async fn release_all(&self) -> Result<ReleaseReport> {
        let ids = self.managed_ids().await?;
        debug!(count = ids.len(), "releasing managed containers");

        let mut report = ReleaseReport::default();
        for id in ids {
            match self.runner.run("docker", &["rm", "-f", &id]).await {
                Ok(output) if output.status.success() => report.released += 1,
                Ok(output) => {
                    let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
                    report.failed.push((id, reason));
                }
                Err(e) => report.failed.push((id, format!("{e:#}"))),
            }
        }
        Ok(report)
    }
}

/// One container ID per non-empty line of `docker ps -q` output.
fn parse_ids(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
