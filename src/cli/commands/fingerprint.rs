//! Fingerprint command - show the canonical dependency set and its hash

use super::resolve_dependencies;
use crate::cli::args::{DataFormat, FingerprintArgs};
use crate::config::Config;
use crate::error::CacheKeyResult;
use crate::key::Fingerprint;
use crate::probe::SystemRunner;

/// Execute the fingerprint command
pub async fn execute(args: FingerprintArgs, config: &Config) -> CacheKeyResult<()> {
    let target = args.target.clone().unwrap_or_default();
    let dependencies = resolve_dependencies(&args.deps, &target, config, &SystemRunner).await?;
    let fingerprint = Fingerprint::compute(&dependencies, config.key.hash);

    print!("{}", render(&fingerprint, args.format)?);
    Ok(())
}

fn render(fingerprint: &Fingerprint, format: DataFormat) -> CacheKeyResult<String> {
    let text = match format {
        DataFormat::Plain => {
            let mut out = String::new();
            for dep in &fingerprint.dependencies {
                out.push_str(dep);
                out.push('\n');
            }
            out.push_str(&format!("{} {}\n", fingerprint.algorithm, fingerprint.hash));
            out
        }
        DataFormat::Env => format!(
            "fingerprint={}\ndependency-count={}\n",
            fingerprint.hash,
            fingerprint.dependencies.len()
        ),
        DataFormat::Json => format!("{}\n", serde_json::to_string_pretty(fingerprint)?),
    };
    Ok(text)
}
