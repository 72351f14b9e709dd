//! Integration tests for cachekey

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const TARGET: &str = "x86_64-unknown-linux-gnu";
    const EXPECTED_KEY: &str = "v0-build-x86_64-unknown-linux-gnu-0.13.0-x86_64-unknown-linux-gnu-4efd6c615ea3b5732c00e95a5821ea49943fcbfa";

    /// Command isolated from the user's config and CI environment
    fn cachekey(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("cachekey");
        cmd.arg("--no-local")
            .arg("--config")
            .arg(home.join("config.toml"))
            .env_remove("CARGO_BUILD_TARGET")
            .env_remove("GITHUB_JOB")
            .env_remove("CACHEKEY_STORE")
            .env_remove("CACHEKEY_CONFIG");
        cmd
    }

    fn key_args() -> Vec<&'static str> {
        vec![
            "key",
            "--target",
            TARGET,
            "--job",
            "build",
            "--toolchain",
            "0.13.0",
            "--dep",
            "ring-0.17.8",
            "--dep",
            "openssl-sys-0.9.102",
        ]
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("build-cache keys"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cachekey"));
    }

    #[test]
    fn key_reference_example() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(key_args())
            .assert()
            .success()
            .stdout(format!("{EXPECTED_KEY}\n"));
    }

    #[test]
    fn key_order_and_duplicates_ignored() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args([
                "key",
                "--target",
                TARGET,
                "--job",
                "build",
                "--toolchain",
                "0.13.0",
                "-d",
                "openssl-sys-0.9.102",
                "-d",
                "ring-0.17.8",
                "-d",
                "openssl-sys-0.9.102",
            ])
            .assert()
            .success()
            .stdout(format!("{EXPECTED_KEY}\n"));
    }

    #[test]
    fn key_env_format() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(key_args())
            .args(["--format", "env"])
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("key={EXPECTED_KEY}\n")))
            .stdout(predicate::str::contains(
                "restore-key=v0-build-x86_64-unknown-linux-gnu-\n",
            ));
    }

    #[test]
    fn key_json_format() {
        let home = TempDir::new().unwrap();
        let output = cachekey(home.path())
            .args(key_args())
            .args(["--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["key"], EXPECTED_KEY);
        assert_eq!(json["restore_prefix"], "v0-build-x86_64-unknown-linux-gnu-");
        assert_eq!(json["dependencies"][0], "openssl-sys-0.9.102");
    }

    #[test]
    fn key_reads_target_and_job_from_env() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .env("CARGO_BUILD_TARGET", TARGET)
            .env("GITHUB_JOB", "build")
            .args([
                "key",
                "--toolchain",
                "0.13.0",
                "-d",
                "ring-0.17.8",
                "-d",
                "openssl-sys-0.9.102",
            ])
            .assert()
            .success()
            .stdout(format!("{EXPECTED_KEY}\n"));
    }

    #[test]
    fn key_deps_file() {
        let home = TempDir::new().unwrap();
        let deps = home.path().join("deps.txt");
        fs::write(&deps, "# native deps\nring-0.17.8\n\nopenssl-sys-0.9.102\n").unwrap();

        cachekey(home.path())
            .args([
                "key", "--target", TARGET, "--job", "build", "--toolchain", "0.13.0",
            ])
            .arg("--deps-file")
            .arg(&deps)
            .assert()
            .success()
            .stdout(format!("{EXPECTED_KEY}\n"));
    }

    #[test]
    fn key_github_output_appends() {
        let home = TempDir::new().unwrap();
        let out = home.path().join("github_output");

        cachekey(home.path())
            .args(key_args())
            .arg("--github-output")
            .arg(&out)
            .assert()
            .success();

        let content = fs::read_to_string(&out).unwrap();
        assert_eq!(
            content,
            format!("key={EXPECTED_KEY}\nrestore-key=v0-build-x86_64-unknown-linux-gnu-\n")
        );
    }

    #[test]
    fn key_config_changes_version_tag() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[key]\nversion_tag = \"v1\"\n").unwrap();

        cachekey(home.path())
            .args(key_args())
            .assert()
            .success()
            .stdout(predicate::str::starts_with("v1-build-"));
    }

    #[test]
    fn key_missing_job_fails_with_hint() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["key", "--target", TARGET, "--toolchain", "1.82.0", "--no-deps"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid input for job_id"))
            .stderr(predicate::str::contains("GITHUB_JOB"));
    }

    #[test]
    fn key_empty_toolchain_fails() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["key", "--target", TARGET, "--job", "build", "--toolchain", "", "--no-deps"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("toolchain_version"));
    }

    #[test]
    fn fingerprint_plain() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["fingerprint", "-d", "ring-0.17.8", "-d", "openssl-sys-0.9.102"])
            .assert()
            .success()
            .stdout(
                "openssl-sys-0.9.102\nring-0.17.8\nsha1 4efd6c615ea3b5732c00e95a5821ea49943fcbfa\n",
            );
    }

    #[test]
    fn save_and_restore_exact() {
        let home = TempDir::new().unwrap();
        let store = home.path().join("store");
        let artifact = home.path().join("target");
        fs::create_dir_all(artifact.join("release")).unwrap();
        fs::write(artifact.join("release").join("app"), "binary").unwrap();

        cachekey(home.path())
            .args(["save", "--key", EXPECTED_KEY])
            .arg("--path")
            .arg(&artifact)
            .arg("--store")
            .arg(&store)
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved"));

        let dest = home.path().join("restored");
        let outputs = home.path().join("outputs");
        cachekey(home.path())
            .args(["restore", "--key", EXPECTED_KEY])
            .args(["--restore-key", "v0-build-x86_64-unknown-linux-gnu-"])
            .arg("--path")
            .arg(&dest)
            .arg("--store")
            .arg(&store)
            .arg("--github-output")
            .arg(&outputs)
            .assert()
            .success()
            .stdout(predicate::str::contains("Restored exact match"));

        assert_eq!(
            fs::read_to_string(dest.join("release").join("app")).unwrap(),
            "binary"
        );
        let outputs = fs::read_to_string(outputs).unwrap();
        assert!(outputs.contains("cache-hit=true\n"));
    }

    #[test]
    fn restore_partial_match() {
        let home = TempDir::new().unwrap();
        let store = home.path().join("store");
        let artifact = home.path().join("bundle.txt");
        fs::write(&artifact, "old build").unwrap();

        let old_key = "v0-build-x86_64-unknown-linux-gnu-1.80.0-x86_64-unknown-linux-gnu-abc";
        cachekey(home.path())
            .args(["save", "--key", old_key])
            .arg("--path")
            .arg(&artifact)
            .arg("--store")
            .arg(&store)
            .assert()
            .success();

        let dest = home.path().join("out.txt");
        let outputs = home.path().join("outputs");
        cachekey(home.path())
            .args(["restore", "--key", EXPECTED_KEY])
            .args(["-r", "v0-build-x86_64-unknown-linux-gnu-"])
            .arg("--path")
            .arg(&dest)
            .arg("--store")
            .arg(&store)
            .arg("--github-output")
            .arg(&outputs)
            .assert()
            .success()
            .stdout(predicate::str::contains("partial match"));

        assert_eq!(fs::read_to_string(&dest).unwrap(), "old build");
        let outputs = fs::read_to_string(outputs).unwrap();
        assert!(outputs.contains("cache-hit=false\n"));
        assert!(outputs.contains(&format!("cache-matched-key={old_key}\n")));
    }

    #[test]
    fn restore_miss() {
        let home = TempDir::new().unwrap();
        let store = home.path().join("store");

        cachekey(home.path())
            .args(["restore", "--key", EXPECTED_KEY, "--path", "unused"])
            .arg("--store")
            .arg(&store)
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache miss"));

        cachekey(home.path())
            .args(["restore", "--key", EXPECTED_KEY, "--path", "unused", "--fail-on-miss"])
            .arg("--store")
            .arg(&store)
            .assert()
            .failure()
            .stderr(predicate::str::contains("No cache entry matched"));
    }

    #[test]
    fn save_missing_artifact_fails() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["save", "--key", "k"])
            .arg("--path")
            .arg(home.path().join("missing"))
            .arg("--store")
            .arg(home.path().join("store"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Artifact not found"));
    }

    #[test]
    fn list_entries() {
        let home = TempDir::new().unwrap();
        let store = home.path().join("store");
        let artifact = home.path().join("a.txt");
        fs::write(&artifact, "a").unwrap();

        cachekey(home.path())
            .args(["list", "--format", "table"])
            .arg("--store")
            .arg(&store)
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entries found"));

        cachekey(home.path())
            .args(["save", "--key", "v0-a"])
            .arg("--path")
            .arg(&artifact)
            .arg("--store")
            .arg(&store)
            .assert()
            .success();

        cachekey(home.path())
            .args(["list", "--format", "plain"])
            .arg("--store")
            .arg(&store)
            .assert()
            .success()
            .stdout("v0-a\n");
    }

    #[test]
    fn prune_dry_run_on_empty_store() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["prune", "--days", "7", "--dry-run"])
            .arg("--store")
            .arg(home.path().join("store"))
            .assert()
            .success()
            .stdout(predicate::str::contains("No entries older than 7 days"));
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[key]"));
    }

    #[test]
    fn config_init_writes_defaults() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["config", "init"])
            .assert()
            .success();

        let content = fs::read_to_string(home.path().join("config.toml")).unwrap();
        assert!(content.contains("version_tag = \"v0\""));
    }

    #[test]
    fn invalid_config_fails() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[key\n").unwrap();

        cachekey(home.path())
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn completions_bash() {
        let home = TempDir::new().unwrap();
        cachekey(home.path())
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cachekey"));
    }
}
