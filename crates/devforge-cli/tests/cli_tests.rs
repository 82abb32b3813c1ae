//! End-to-end tests for the `devforge` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temporary home, working directory and template registry.
struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self {
            root: TempDir::new().unwrap(),
        };
        fs::create_dir_all(sandbox.work()).unwrap();
        fs::create_dir_all(sandbox.registry()).unwrap();
        sandbox
    }

    fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    fn work(&self) -> PathBuf {
        self.root.path().join("work")
    }

    fn registry(&self) -> PathBuf {
        self.root.path().join("registry")
    }

    /// `devforge` isolated from the user's config, pointed at the sandbox
    /// registry.
    fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--templates-dir").arg(self.registry());
        cmd
    }

    /// Like [`cmd`](Self::cmd) without `--templates-dir`.
    fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("devforge").unwrap();
        cmd.current_dir(self.work())
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env("XDG_DATA_HOME", self.home().join(".local/share"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("DEVFORGE_AUTHOR")
            .env_remove("DEVFORGE_LICENSE")
            .env_remove("DEVFORGE_TEMPLATE_DIR")
            .env_remove("DEVFORGE_PLUGINS__ENABLED");
        cmd
    }

    fn add_template(&self, name: &str, files: &[(&str, &str)]) {
        for (path, contents) in files {
            write(&self.registry().join(name).join(path), contents);
        }
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.work().join(relative)).unwrap()
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn node_template(sandbox: &Sandbox) {
    sandbox.add_template(
        "node",
        &[
            (
                "package.json.hbs",
                r#"{"name": "{{projectName}}", "author": "{{author}}", "license": "{{license}}"}"#,
            ),
            ("README.md", "# Title {{not substituted}}\n"),
            (
                "src/index.ts.hbs",
                "{{#if testing}}// tested\n{{/if}}export const name = '{{camelCase projectName}}';\n",
            ),
            ("template.json", r#"{"description": "Node starter"}"#),
        ],
    );
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("template"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn shell_completions() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devforge"));
}

// ── create ────────────────────────────────────────────────────────────────────

#[test]
fn create_renders_the_template() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .args(["create", "my-app", "-t", "node", "--author", "Ada", "--testing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 'my-app'"))
        .stdout(predicate::str::contains("cd my-app"))
        .stdout(predicate::str::contains("npm install"));

    assert_eq!(
        sandbox.read("my-app/package.json"),
        r#"{"name": "my-app", "author": "Ada", "license": "MIT"}"#
    );
    assert_eq!(sandbox.read("my-app/README.md"), "# Title {{not substituted}}\n");
    assert_eq!(
        sandbox.read("my-app/src/index.ts"),
        "// tested\nexport const name = 'myApp';\n"
    );
    assert!(!sandbox.work().join("my-app/template.json").exists());
    assert!(!sandbox.work().join("my-app/package.json.hbs").exists());
}

#[test]
fn create_honours_output_and_skips() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .args(["create", "svc", "-t", "node", "-o", "apps", "--no-git", "--no-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git init").not())
        .stdout(predicate::str::contains("npm install").not());

    assert!(sandbox.work().join("apps/svc/package.json").is_file());
}

#[test]
fn invalid_name_fails_before_any_io() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .args(["create", "Bad Name", "-t", "node"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));

    assert_eq!(fs::read_dir(sandbox.work()).unwrap().count(), 0);
}

#[test]
fn unknown_template_is_not_found() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["create", "demo", "-t", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Template 'ghost' not found"));

    assert!(!sandbox.work().join("demo").exists());
}

#[test]
fn malformed_template_reports_the_file() {
    let sandbox = Sandbox::new();
    sandbox.add_template("broken", &[("a.txt.hbs", "{{#if x}}open")]);

    sandbox
        .cmd()
        .args(["create", "demo", "-t", "broken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("a.txt.hbs"))
        .stderr(predicate::str::contains("unclosed"));
}

#[test]
fn dry_run_writes_nothing() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .args(["create", "demo", "-t", "node", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("src/index.ts"));

    assert!(!sandbox.work().join("demo").exists());
}

#[test]
fn json_report_includes_typed_sets() {
    let sandbox = Sandbox::new();
    sandbox.add_template("conf", &[("app.json.hbs", r#"{"port": {{port}}}"#)]);

    let assert = sandbox
        .cmd()
        .args([
            "--output-format",
            "json",
            "create",
            "demo",
            "-t",
            "conf",
            "--set",
            "port=8080",
            "--set",
            "strict=true",
        ])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["rendered"], serde_json::json!(["app.json"]));
    assert_eq!(report["config"]["port"], serde_json::json!(8080));
    assert_eq!(report["config"]["strict"], serde_json::json!(true));
    assert_eq!(sandbox.read("demo/app.json"), r#"{"port": 8080}"#);
}

#[test]
fn quiet_create_prints_nothing() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .args(["-q", "create", "demo", "-t", "node"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn environment_supplies_defaults_and_plugins() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    sandbox
        .cmd()
        .env("DEVFORGE_AUTHOR", "Env Author")
        .env("DEVFORGE_PLUGINS__ENABLED", "readme-notes")
        .args(["create", "demo", "-t", "node", "--typescript"])
        .assert()
        .success();

    assert!(sandbox.read("demo/package.json").contains(r#""author": "Env Author""#));
    let readme = sandbox.read("demo/README.md");
    assert!(readme.contains("## Getting started"), "{readme}");
    assert!(readme.contains("- TypeScript"), "{readme}");
}

#[test]
fn unknown_plugin_is_a_configuration_error() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);
    write(
        &sandbox.work().join(".devforge.toml"),
        "[plugins]\nenabled = [\"ai-docs\"]\n",
    );

    sandbox
        .cmd()
        .args(["create", "demo", "-t", "node"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown plugin 'ai-docs'"));
}

#[test]
fn fresh_install_creates_with_the_default_template() {
    let sandbox = Sandbox::new();
    let registry = sandbox.home().join(".local/share/devforge/templates");
    assert!(!registry.exists());

    sandbox
        .bare_cmd()
        .args(["create", "demo", "--testing"])
        .assert()
        .success();

    let package: serde_json::Value =
        serde_json::from_str(&sandbox.read("demo/package.json")).unwrap();
    assert_eq!(package["name"], "demo");
    assert!(package["scripts"]["test"].is_string());
    assert!(registry.join("node-typescript/template.json").is_file());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let hook = sandbox.work().join("demo/.husky/pre-commit");
        let mode = fs::metadata(hook).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }

    sandbox
        .bare_cmd()
        .args(["template", "list", "--format", "list"])
        .assert()
        .success()
        .stdout("node-typescript\n");
}

#[test]
fn removed_bundled_template_stays_removed() {
    let sandbox = Sandbox::new();

    sandbox
        .bare_cmd()
        .args(["template", "remove", "node-typescript"])
        .assert()
        .success();

    sandbox
        .bare_cmd()
        .args(["create", "demo"])
        .assert()
        .code(3);
}

// ── template registry ─────────────────────────────────────────────────────────

#[test]
fn template_add_list_remove() {
    let sandbox = Sandbox::new();
    write(&sandbox.work().join("starter/README.md.hbs"), "# {{projectName}}");

    sandbox
        .cmd()
        .args(["template", "add", "starter", "starter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added template 'starter'"));

    sandbox
        .cmd()
        .args(["template", "list", "--format", "list"])
        .assert()
        .success()
        .stdout("starter\n");

    sandbox
        .cmd()
        .args(["template", "add", "starter", "starter"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    sandbox
        .cmd()
        .args(["template", "remove", "starter"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["template", "remove", "starter"])
        .assert()
        .code(3);
}

#[test]
fn template_list_json_has_descriptions() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);

    let assert = sandbox
        .cmd()
        .args(["template", "list", "--format", "json"])
        .assert()
        .success();

    let list: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(list[0]["name"], "node");
    assert_eq!(list[0]["description"], "Node starter");
}

// ── extract ───────────────────────────────────────────────────────────────────

#[test]
fn extract_then_create() {
    let sandbox = Sandbox::new();
    let project = sandbox.work().join("acme-site");
    write(&project.join("package.json"), r#"{"name": "acme-site"}"#);
    write(&project.join("src/main.ts"), "start();\n");
    write(&project.join("node_modules/x/index.js"), "ignored");
    write(&project.join(".gitignore"), "*.log\n");
    write(&project.join("debug.log"), "ignored");

    sandbox
        .cmd()
        .args(["extract", "acme-site", "--name", "acme", "--templatize", "package.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted template 'acme'"));

    let template = sandbox.registry().join("acme");
    assert_eq!(
        fs::read_to_string(template.join("package.json.hbs")).unwrap(),
        r#"{"name": "{{projectName}}"}"#
    );
    assert!(template.join("template.json").is_file());
    assert!(!template.join("node_modules").exists());
    assert!(!template.join("debug.log").exists());

    sandbox
        .cmd()
        .args(["create", "fresh", "-t", "acme"])
        .assert()
        .success();
    assert_eq!(sandbox.read("fresh/package.json"), r#"{"name": "fresh"}"#);
    assert_eq!(sandbox.read("fresh/src/main.ts"), "start();\n");
}

#[test]
fn extract_missing_source_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["extract", "nowhere"])
        .assert()
        .code(3);
}

// ── plugins & config ──────────────────────────────────────────────────────────

#[test]
fn plugin_list_shows_builtins() {
    Sandbox::new()
        .cmd()
        .args(["plugin", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults"))
        .stdout(predicate::str::contains("readme-notes"))
        .stdout(predicate::str::contains("disabled"));
}

#[test]
fn config_set_then_get() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "defaults.author", "Grace"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["config", "get", "defaults.author"])
        .assert()
        .success()
        .stdout("Grace\n");

    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    sandbox
        .cmd()
        .args(["config", "get", "defaults.nope"])
        .assert()
        .code(2);
}

#[test]
fn init_writes_local_config_once() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed template 'node-typescript'"));
    assert!(sandbox.registry().join("node-typescript/package.json.hbs").is_file());
    let written = fs::read_to_string(sandbox.work().join(".devforge.toml")).unwrap();
    assert!(written.contains("[defaults]"));
    assert!(written.contains("node-typescript"));

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    sandbox
        .cmd()
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed template").not());
}

#[test]
fn broken_config_file_exits_with_configuration_code() {
    let sandbox = Sandbox::new();
    write(&sandbox.work().join(".devforge.toml"), "[defaults\nauthor = ");

    sandbox
        .cmd()
        .args(["template", "list"])
        .assert()
        .code(4);
}

#[test]
fn log_file_receives_debug_events() {
    let sandbox = Sandbox::new();
    node_template(&sandbox);
    let log = sandbox.root.path().join("logs/devforge.log");

    sandbox
        .cmd()
        .arg("--log-file")
        .arg(&log)
        .args(["create", "demo", "-t", "node"])
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("render complete"), "{text}");
}
