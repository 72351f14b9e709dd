//! Toolchain version probe

use super::{describe, CommandRunner};
use crate::error::{CacheKeyError, CacheKeyResult};
use tracing::{debug, warn};

/// Read the compiler release from `<rustc> -vV`
pub async fn probe_toolchain_version(
    runner: &dyn CommandRunner,
    rustc: &str,
) -> CacheKeyResult<String> {
    let args = vec!["-vV".to_string()];
    let output = runner.run(rustc, &args).await?;

    if !output.success {
        return Err(CacheKeyError::command_exec(
            describe(rustc, &args),
            output.stderr.trim(),
        ));
    }

    let release = parse_release(&output.stdout).ok_or_else(|| {
        CacheKeyError::invalid_input(
            "toolchain_version",
            format!("no release line in output of {}", describe(rustc, &args)),
        )
    })?;

    if semver::Version::parse(&release).is_err() {
        warn!("Toolchain release '{}' is not a semantic version", release);
    }

    debug!("Probed toolchain version: {}", release);
    Ok(release)
}

/// Extract the `release:` value from verbose version output
fn parse_release(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("release:"))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
