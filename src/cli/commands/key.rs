//! Key command - derive a cache key and restore prefix

use super::{append_outputs, require_field, resolve_dependencies};
use crate::cli::args::{DataFormat, KeyArgs};
use crate::config::Config;
use crate::error::CacheKeyResult;
use crate::key::{CacheKeyInput, CacheKeyOutput};
use crate::probe::{probe_toolchain_version, CommandRunner, SystemRunner};
use serde::Serialize;
use tracing::info;

/// JSON shape of the key command output
#[derive(Debug, Serialize)]
struct KeyReport<'a> {
    key: &'a str,
    restore_prefix: &'a str,
    restore_keys: Vec<String>,
    platform_target: &'a str,
    job_id: &'a str,
    toolchain_version: &'a str,
    hash_algorithm: String,
    fingerprint: &'a str,
    dependencies: &'a [String],
}

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> CacheKeyResult<()> {
    derive_and_print(args, config, &SystemRunner).await
}

async fn derive_and_print(
    args: KeyArgs,
    config: &Config,
    runner: &dyn CommandRunner,
) -> CacheKeyResult<()> {
    let (input, output) = derive(&args, config, runner).await?;
    info!("Cache key: {}", output.key);

    print!("{}", render(&input, &output, args.format)?);

    if let Some(ref path) = args.github_output {
        append_outputs(
            path,
            &[
                ("key", output.key.as_str()),
                ("restore-key", output.restore_prefix.as_str()),
            ],
        )
        .await?;
    }

    Ok(())
}

/// Gather inputs (probing what was not given) and derive the key
async fn derive(
    args: &KeyArgs,
    config: &Config,
    runner: &dyn CommandRunner,
) -> CacheKeyResult<(CacheKeyInput, CacheKeyOutput)> {
    let target = args.target.clone().unwrap_or_default();
    let job = args.job.clone().unwrap_or_default();
    require_field("platform_target", &target)?;
    require_field("job_id", &job)?;

    let toolchain = match args.toolchain {
        Some(ref version) => version.clone(),
        None => probe_toolchain_version(runner, &config.probe.rustc).await?,
    };

    let dependencies = resolve_dependencies(&args.deps, &target, config, runner).await?;
    let input = CacheKeyInput::new(target, job, toolchain).with_dependencies(dependencies);
    let output = config.deriver().derive(&input)?;

    Ok((input, output))
}

fn render(
    input: &CacheKeyInput,
    output: &CacheKeyOutput,
    format: DataFormat,
) -> CacheKeyResult<String> {
    let text = match format {
        DataFormat::Plain => format!("{}\n", output.key),
        DataFormat::Env => format!(
            "key={}\nrestore-key={}\n",
            output.key, output.restore_prefix
        ),
        DataFormat::Json => {
            let report = KeyReport {
                key: &output.key,
                restore_prefix: &output.restore_prefix,
                restore_keys: output.restore_keys(),
                platform_target: &input.platform_target,
                job_id: &input.job_id,
                toolchain_version: &input.toolchain_version,
                hash_algorithm: output.fingerprint.algorithm.to_string(),
                fingerprint: &output.fingerprint.hash,
                dependencies: &output.fingerprint.dependencies,
            };
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        }
    };
    Ok(text)
}
