use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct CliTestEnv {
    temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn seen_ids_path(&self) -> PathBuf {
        self.temp_dir.path().join("seen_ids.pkl")
    }
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("ticketbay-notifier"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("NGL_USERNAME")
        .env_remove("CHECK_INTERVAL")
        .env_remove("MAX_PAGES")
        .env_remove("SEEN_IDS_PATH")
        .stdin(Stdio::null())
        .output()
        .unwrap_or_else(|e| panic!("failed to execute ticketbay-notifier: {e}"))
}

#[test]
fn help_lists_the_recognized_options() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--interval", "--max-pages", "--seen-ids-path", "--username"] {
        assert!(stdout.contains(flag), "missing {flag} in help:\n{stdout}");
    }
}

#[test]
fn missing_username_with_empty_stdin_fails() {
    let env = CliTestEnv::new();
    let output = run_bin(&env, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NGL username"), "unexpected stderr:\n{stderr}");
    assert!(!env.seen_ids_path().exists());
}

#[test]
fn invalid_interval_is_rejected_before_monitoring() {
    let env = CliTestEnv::new();
    let seen = env.seen_ids_path();
    let seen = seen.to_str().expect("utf-8 temp path");
    let output = run_bin(
        &env,
        &["--username", "alice", "--interval=-3", "--seen-ids-path", seen],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interval_secs"), "unexpected stderr:\n{stderr}");
    assert!(!env.seen_ids_path().exists());
}

#[test]
fn invalid_config_file_is_reported() {
    let env = CliTestEnv::new();
    let config_dir = env.xdg_config.join("ticketbay-notifier");
    fs::create_dir_all(&config_dir).expect("failed to create config dir");
    fs::write(config_dir.join("config.toml"), "[monitor\nmax_pages = ").expect("write config");

    let output = run_bin(&env, &["--username", "alice"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration"), "unexpected stderr:\n{stderr}");
}
