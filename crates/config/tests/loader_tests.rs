//! Tests for the `pourpal-config` loader: defaults, file discovery, and
//! environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use pourpal_config::{load, AppConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "POURPAL_CONFIG",
    "POURPAL__AUTH__SESSION_COOKIE",
    "POURPAL__DATABASE__MAX_CONNECTIONS",
    "POURPAL__DATABASE__URL",
    "POURPAL__HTTP__ADDRESS",
    "POURPAL__HTTP__PORT",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        let mut ctx = Self {
            vars: Vec::new(),
            original_dir: None,
        };
        for key in ENV_VARS_TO_RESET {
            ctx.remove_var(key);
        }
        ctx
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn defaults_apply_without_file_or_env() {
    let _ctx = TestContext::new();

    let config = load().expect("load defaults");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.auth.session_cookie, "sessionid");
}

#[test]
#[serial]
fn config_file_overrides_defaults() {
    let mut ctx = TestContext::new();

    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("pourpal.toml");
    fs::write(
        &path,
        r#"
[http]
address = "0.0.0.0"
port = 9000

[database]
url = "sqlite://chat-test.db"
max_connections = 3
"#,
    )
    .expect("write config file");

    ctx.set_var("POURPAL_CONFIG", path.to_string_lossy());

    let config = load().expect("load from file");
    assert_eq!(config.http.address, "0.0.0.0");
    assert_eq!(config.http.port, 9000);
    assert_eq!(config.database.url, "sqlite://chat-test.db");
    assert_eq!(config.database.max_connections, 3);
    // Untouched sections keep their defaults.
    assert_eq!(config.auth.session_cookie, "sessionid");
}

#[test]
#[serial]
fn discovered_file_in_working_directory_is_used() {
    let mut ctx = TestContext::new();

    let dir = TempDir::new().expect("create temp dir");
    fs::write(
        dir.path().join("pourpal.toml"),
        "[http]\nport = 8123\n",
    )
    .expect("write config file");
    ctx.set_current_dir(dir.path());

    let config = load().expect("load discovered file");
    assert_eq!(config.http.port, 8123);
}

#[test]
#[serial]
fn environment_overrides_win_over_file() {
    let mut ctx = TestContext::new();

    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("pourpal.toml");
    fs::write(&path, "[http]\nport = 9000\n").expect("write config file");

    ctx.set_var("POURPAL_CONFIG", path.to_string_lossy());
    ctx.set_var("POURPAL__HTTP__PORT", "9001");
    ctx.set_var("POURPAL__AUTH__SESSION_COOKIE", "pp_session");

    let config = load().expect("load with env overrides");
    assert_eq!(config.http.port, 9001);
    assert_eq!(config.auth.session_cookie, "pp_session");
}
