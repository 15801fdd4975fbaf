//! Integration tests for the infragen binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A repository with one config package and minimal templates.
fn fixture(orchestrator: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir(root.join(".git")).unwrap();

    let pkg = "config/packages/core";
    write(
        root,
        &format!("{pkg}/config.yaml"),
        &format!(
            "infrastructure:\n  platform: proxmox\n  provider: terraform\n\
             container_orchestration:\n  orchestrator: {orchestrator}\n"
        ),
    );
    write(
        root,
        &format!("{pkg}/hosts.yaml"),
        "hosts:\n  - name: cp-1\n    role: control-plane\n    ip: 10.0.0.10\n",
    );
    write(root, &format!("{pkg}/networks.yaml"), "networks: []\n");
    write(root, &format!("{pkg}/platforms/proxmox.yaml"), "proxmox:\n  node_name: pve\n");
    write(
        root,
        &format!("{pkg}/orchestrators/kubespray.yaml"),
        "kubespray:\n  cluster_name: lab\n",
    );
    write(root, &format!("{pkg}/platform/stacks.yaml"), "stacks: {}\n");
    write(root, &format!("{pkg}/business/apps.yaml"), "applications: []\n");

    let t = "api/templates";
    write(
        root,
        &format!("{t}/infrastructure/proxmox/terraform/terraform.tfvars.tmpl"),
        "node = {{ proxmox.node_name | quote }}\n",
    );
    write(
        root,
        &format!("{t}/container-orchestration/kubespray/inventory.ini.tmpl"),
        "{% for h in hosts %}{{ h.name }} ansible_host={{ h.ip }}\n{% endfor %}",
    );
    write(
        root,
        &format!("{t}/container-orchestration/kubespray/group_vars/all.yaml.tmpl"),
        "cluster: {{ kubespray.cluster_name }}\n",
    );
    write(
        root,
        &format!("{t}/container-orchestration/kubespray/group_vars/k8s_cluster.yaml.tmpl"),
        "{{ toYaml(kubespray) }}",
    );
    write(root, &format!("{t}/provisioner/provisioner.json.tmpl"), "{{ toJson(hosts) }}\n");
    write(root, &format!("{t}/platform/platform.yaml.tmpl"), "stacks: {{ stacks | length }}\n");
    write(root, &format!("{t}/business/business.yaml.tmpl"), "apps: {{ applications | length }}\n");
    dir
}

/// `infragen` isolated from the user's config and environment.
fn infragen(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("infragen").unwrap();
    cmd.current_dir(cwd)
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd.join(".xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("INFRAGEN_REPO_ROOT");
    cmd
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn generate_without_id_is_usage_error() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .args(["generate", "env"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--id"));
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_env_writes_artifacts_and_reports_progress() {
    let repo = fixture("kubespray");

    infragen(repo.path())
        .args(["generate", "env", "--id", "development", "--config", "core"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Master config loaded (platform: proxmox, orchestrator: kubespray)"))
        .stdout(predicate::str::contains("Generated: kubespray/inventory.ini"))
        .stdout(predicate::str::contains("Generated: metadata.json"));

    let out = repo.path().join("api/outputs/development");
    assert_eq!(
        fs::read_to_string(out.join("terraform.tfvars")).unwrap(),
        "node = \"pve\"\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("kubespray/inventory.ini")).unwrap(),
        "cp-1 ansible_host=10.0.0.10\n"
    );
    assert!(out.join("kubesprayConfig.json").is_file());
    assert!(out.join("metadata.json").is_file());
}

#[test]
fn repo_root_discovered_from_subdirectory() {
    let repo = fixture("kubespray");
    let nested = repo.path().join("api/templates");

    infragen(&nested)
        .args(["generate", "env", "--id", "dev"])
        .assert()
        .success();

    assert!(repo.path().join("api/outputs/dev/metadata.json").is_file());
}

#[test]
fn json_output_is_the_report() {
    let repo = fixture("kubespray");

    let assert = infragen(repo.path())
        .args(["--output-format", "json", "generate", "env", "--id", "qa"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["environment"], "qa");
    assert_eq!(report["manifest"]["masterConfig"]["platform"], "proxmox");
    assert_eq!(report["manifest"]["configPackage"]["version"], "v1.0.0");
    assert_eq!(report["written"].as_array().unwrap().len(), 9);
}

#[test]
fn relative_repo_root_still_records_absolute_paths() {
    let repo = fixture("kubespray");
    let work = repo.path().join("work");
    fs::create_dir(&work).unwrap();

    let assert = infragen(&work)
        .args(["--repo-root", "..", "--output-format", "json", "generate", "env", "--id", "qa"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let files = report["manifest"]["files"].as_object().unwrap();
    assert!(!files.is_empty());
    for path in files.values() {
        let path = Path::new(path.as_str().unwrap());
        assert!(path.is_absolute(), "{}", path.display());
        assert!(path.exists(), "{}", path.display());
    }
}

#[test]
fn environment_id_with_path_parts_exits_two() {
    let repo = fixture("kubespray");

    infragen(repo.path())
        .args(["generate", "env", "--id", "../shared"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid environment id '../shared'"));

    assert!(!repo.path().join("api/outputs").exists());
    assert!(!repo.path().join("api/shared").exists());
}

#[test]
fn validate_only_writes_nothing() {
    let repo = fixture("kubespray");

    infragen(repo.path())
        .args(["generate", "env", "--id", "dev", "--validate-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation complete"));

    assert!(!repo.path().join("api/outputs").exists());
}

#[test]
fn unsupported_orchestrator_exits_two() {
    let repo = fixture("swarm");

    infragen(repo.path())
        .args(["generate", "env", "--id", "dev"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported orchestrator: swarm"))
        .stderr(predicate::str::contains("kubespray, kubekey, kind"));

    assert!(!repo.path().join("api/outputs").exists());
}

#[test]
fn missing_package_exits_three() {
    let repo = fixture("kubespray");

    infragen(repo.path())
        .args(["generate", "env", "--id", "dev", "--config", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("master config not found"));
}

#[test]
fn template_error_names_template() {
    let repo = fixture("kubespray");
    write(
        repo.path(),
        "api/templates/business/business.yaml.tmpl",
        "{{ missing.field }}\n",
    );

    infragen(repo.path())
        .args(["generate", "env", "--id", "dev"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("business.yaml.tmpl"));

    assert!(!repo.path().join("api/outputs/dev/metadata.json").exists());
}

// ── validate ──────────────────────────────────────────────────────────────────

#[test]
fn validate_without_validator_binary_exits_three() {
    let repo = fixture("kubespray");
    write(
        repo.path(),
        "infragen.toml",
        "[validator]\ncommand = \"no-such-validator-binary\"\n",
    );

    infragen(repo.path())
        .args(["validate", "--target", "definitions"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no-such-validator-binary not found"));
}

#[cfg(unix)]
#[test]
fn validate_definitions_runs_validator_per_file() {
    use std::os::unix::fs::PermissionsExt;

    let repo = fixture("kubespray");
    let script = repo.path().join("fake-validator");
    fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    write(
        repo.path(),
        "custom.toml",
        &format!("[validator]\ncommand = \"{}\"\n", script.display()),
    );
    write(repo.path(), "api/definitions/sizes/small.yml", "name: small\n");

    infragen(repo.path())
        .args(["--config-file", "custom.toml", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("small.yml"))
        .stdout(predicate::str::contains("No definition files found"))
        .stdout(predicate::str::contains("Definitions validated successfully."));
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn config_get_reads_local_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "infragen.toml", "[defaults]\nconfig_package = \"lab\"\n");

    infragen(dir.path())
        .args(["config", "get", "defaults.config_package"])
        .assert()
        .success()
        .stdout(predicate::str::diff("lab\n"));
}

#[test]
fn config_get_unknown_key_exits_four() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn init_local_writes_defaults() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("infragen.toml")).unwrap();
    assert!(text.contains("config_package = \"core\""));
    assert!(text.contains("yaml-validator-cli"));
}

#[test]
fn completions_bash() {
    let dir = TempDir::new().unwrap();
    infragen(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("infragen"));
}
