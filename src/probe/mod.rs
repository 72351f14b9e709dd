//! Upstream probes that supply key inputs
//!
//! Wraps the external commands a CI job would shell out to (`rustc -vV`,
//! `cargo tree`) behind a runner trait so the parsing can be tested
//! without a toolchain installed.

pub mod deps;
pub mod toolchain;

pub use deps::{enumerate_dependencies, parse_tree_output, read_dependency_list, NativeFilter, TreeQuery};
pub use toolchain::probe_toolchain_version;

use crate::error::{CacheKeyError, CacheKeyResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of an external command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

/// Runs external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture its output
    async fn run(&self, program: &str, args: &[String]) -> CacheKeyResult<CommandOutput>;
}

/// Runner that spawns real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> CacheKeyResult<CommandOutput> {
        debug!("Executing: {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CacheKeyError::command_failed(describe(program, args), e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Render a command line for error messages
pub(crate) fn describe(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_args() {
        let args = vec!["-vV".to_string()];
        assert_eq!(describe("rustc", &args), "rustc -vV");
        assert_eq!(describe("rustc", &[]), "rustc");
    }

    #[tokio::test]
    async fn system_runner_missing_program() {
        let result = SystemRunner
            .run("cachekey-definitely-not-a-real-program", &[])
            .await;
        assert!(matches!(result, Err(CacheKeyError::CommandFailed { .. })));
    }
}
