//! Native dependency enumeration
//!
//! Lists the resolved dependency tree with `cargo tree` and keeps only the
//! crates that build or link native code. Those are the ones whose compiled
//! artifacts go stale when the cache is reused across dependency changes.

use super::{describe, CommandRunner};
use crate::error::{CacheKeyError, CacheKeyResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Name heuristics that select native-code crates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeFilter {
    /// Crate name suffixes (e.g., "-sys")
    pub suffixes: Vec<String>,
    /// Crate name prefixes (e.g., "openssl")
    pub prefixes: Vec<String>,
    /// Exact crate names (e.g., "cc")
    pub names: Vec<String>,
}

impl Default for NativeFilter {
    fn default() -> Self {
        Self {
            suffixes: vec!["-sys".to_string()],
            prefixes: vec!["openssl".to_string()],
            names: ["cc", "ring", "cmake", "bindgen", "pkg-config"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NativeFilter {
    /// Whether a crate name matches any heuristic
    pub fn matches(&self, name: &str) -> bool {
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.names.iter().any(|n| n == name)
    }
}

/// A crate line from `cargo tree`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Crate name
    pub name: String,
    /// Version without the leading `v`
    pub version: String,
}

impl TreeEntry {
    /// `name-version` identifier fed into the fingerprint
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Parameters for the `cargo tree` invocation
#[derive(Debug, Clone)]
pub struct TreeQuery {
    /// Cargo executable
    pub cargo: String,
    /// Target triple to resolve for
    pub target: String,
    /// Dependency kinds passed to `-e`
    pub edges: String,
    /// Manifest of the project (defaults to cargo's discovery)
    pub manifest_path: Option<PathBuf>,
}

impl TreeQuery {
    /// Command-line arguments for cargo
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "tree".to_string(),
            "--target".to_string(),
            self.target.clone(),
            "-e".to_string(),
            self.edges.clone(),
            "--prefix".to_string(),
            "none".to_string(),
            "--format".to_string(),
            "{p}".to_string(),
        ];
        if let Some(ref path) = self.manifest_path {
            args.push("--manifest-path".to_string());
            args.push(path.display().to_string());
        }
        args
    }
}

/// Enumerate native dependency identifiers for a target
///
/// Any failure to run or read the tree is reported as invalid input for
/// `dependencies`: a key must never be derived from a partial list.
pub async fn enumerate_dependencies(
    runner: &dyn CommandRunner,
    query: &TreeQuery,
    filter: &NativeFilter,
) -> CacheKeyResult<Vec<String>> {
    let args = query.args();
    let command = describe(&query.cargo, &args);

    let output = runner
        .run(&query.cargo, &args)
        .await
        .map_err(|e| CacheKeyError::invalid_input("dependencies", e.to_string()))?;

    if !output.success {
        return Err(CacheKeyError::invalid_input(
            "dependencies",
            format!("{} failed: {}", command, output.stderr.trim()),
        ));
    }

    let entries = parse_tree_output(&output.stdout);
    let total = entries.len();
    let native: Vec<String> = entries
        .into_iter()
        .filter(|e| filter.matches(&e.name))
        .map(|e| e.identifier())
        .collect();

    debug!(
        "Selected {} native dependencies out of {} tree entries",
        native.len(),
        total
    );
    Ok(native)
}

/// Parse `cargo tree` output into crate entries
///
/// Accepts both `--prefix none` output and the indented tree with drawing
/// characters. Section headers and unparseable lines are skipped.
pub fn parse_tree_output(stdout: &str) -> Vec<TreeEntry> {
    stdout.lines().filter_map(parse_tree_line).collect()
}

fn parse_tree_line(line: &str) -> Option<TreeEntry> {
    let line = line.trim_start_matches(|c: char| !c.is_alphanumeric() && c != '[');
    if line.is_empty() || line.starts_with('[') {
        return None;
    }

    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let version = parts.next().and_then(|v| v.strip_prefix('v'));

    match version {
        Some(v) if v.starts_with(|c: char| c.is_ascii_digit()) => Some(TreeEntry {
            name: name.to_string(),
            version: v.to_string(),
        }),
        _ => {
            trace!("Skipping tree line: {}", line);
            None
        }
    }
}

/// Parse an explicit dependency list, one identifier per line
///
/// Blank lines and `#` comments are ignored.
pub fn read_dependency_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::testing::FakeRunner;

    const TREE_NONE: &str = "\
myapp v0.1.0 (/work/myapp)
openssl v0.10.64
openssl-sys v0.9.102
cc v1.0.98
libc v0.2.155
pkg-config v0.3.30
ring v0.17.8
ring v0.17.8 (*)
serde v1.0.203
";

    const TREE_INDENTED: &str = "\
myapp v0.1.0 (/work/myapp)
├── libz-sys v1.1.18
│   [build-dependencies]
│   ├── cc v1.0.98
│   └── vcpkg v0.2.15
└── ring v0.17.8
    └── spin v0.9.8
";

    fn query() -> TreeQuery {
        TreeQuery {
            cargo: "cargo".to_string(),
            target: "x86_64-unknown-linux-gnu".to_string(),
            edges: "normal,build".to_string(),
            manifest_path: None,
        }
    }

    #[test]
    fn default_filter_matches() {
        let filter = NativeFilter::default();
        assert!(filter.matches("openssl-sys"));
        assert!(filter.matches("openssl"));
        assert!(filter.matches("ring"));
        assert!(filter.matches("cc"));
        assert!(!filter.matches("ringbuf"));
        assert!(!filter.matches("serde"));
        assert!(!filter.matches("sysinfo"));
    }

    #[test]
    fn parse_prefix_none() {
        let entries = parse_tree_output(TREE_NONE);
        assert_eq!(entries.len(), 9);
        assert_eq!(entries[2].identifier(), "openssl-sys-0.9.102");
    }

    #[test]
    fn parse_indented_tree() {
        let names: Vec<String> = parse_tree_output(TREE_INDENTED)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["myapp", "libz-sys", "cc", "vcpkg", "ring", "spin"]);
    }

    #[test]
    fn parse_skips_noise() {
        assert!(parse_tree_line("").is_none());
        assert!(parse_tree_line("[dev-dependencies]").is_none());
        assert!(parse_tree_line("warning: something").is_none());
        assert!(parse_tree_line("name vNext").is_none());
    }

    #[test]
    fn read_list_skips_comments() {
        let deps = read_dependency_list("# native\nring-0.17.8\n\n  cc-1.0.98  \n");
        assert_eq!(deps, vec!["ring-0.17.8", "cc-1.0.98"]);
    }

    #[test]
    fn query_args_with_manifest() {
        let mut q = query();
        q.manifest_path = Some(PathBuf::from("crates/app/Cargo.toml"));
        let args = q.args();
        assert_eq!(args[0], "tree");
        assert!(args.windows(2).any(|w| w == ["--target", "x86_64-unknown-linux-gnu"]));
        assert_eq!(&args[args.len() - 2..], ["--manifest-path", "crates/app/Cargo.toml"]);
    }

    #[tokio::test]
    async fn enumerate_filters_native() {
        let runner = FakeRunner::new().respond("cargo", true, TREE_NONE, "");
        let deps = enumerate_dependencies(&runner, &query(), &NativeFilter::default())
            .await
            .unwrap();

        assert_eq!(
            deps,
            vec![
                "openssl-0.10.64",
                "openssl-sys-0.9.102",
                "cc-1.0.98",
                "pkg-config-0.3.30",
                "ring-0.17.8",
                "ring-0.17.8",
            ]
        );
    }

    #[tokio::test]
    async fn enumerate_failure_is_invalid_input() {
        let runner = FakeRunner::new().respond("cargo", false, "", "error: could not find Cargo.toml");
        let err = enumerate_dependencies(&runner, &query(), &NativeFilter::default())
            .await
            .unwrap_err();

        match err {
            CacheKeyError::InvalidInput { field, reason } => {
                assert_eq!(field, "dependencies");
                assert!(reason.contains("could not find Cargo.toml"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn enumerate_spawn_failure_is_invalid_input() {
        let runner = FakeRunner::new();
        let err = enumerate_dependencies(&runner, &query(), &NativeFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CacheKeyError::InvalidInput {
                field: "dependencies",
                ..
            }
        ));
    }
}
