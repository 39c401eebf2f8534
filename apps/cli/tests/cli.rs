use assert_cmd::Command;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use xcsim_core::fixtures::{device_type_key, runtime_key, SimulatorTree};
use xcsim_core::DEVICE_APP_DATA_RELATIVE_PATH;

const IPHONE: &str = "IPHONE-9-2";
const IPAD: &str = "IPAD-9-2";

fn simulators() -> TempDir {
    let dir = tempdir().expect("tempdir");
    let tree = SimulatorTree::new(dir.path());
    tree.write_device_set(&[
        (
            runtime_key("iOS", "9.2"),
            vec![
                (device_type_key("iPhone 5s"), IPHONE.to_string()),
                (device_type_key("iPad Air"), IPAD.to_string()),
            ],
        ),
        (
            runtime_key("iOS", "8.4"),
            vec![(device_type_key("iPhone 5s"), "NEVER-BOOTED".to_string())],
        ),
    ])
    .expect("device set");
    tree.provision(IPHONE).expect("provision");
    tree.provision(IPAD).expect("provision");
    tree.install_bundle(IPHONE, "B1", "com.acme.App").expect("bundle");
    tree.add_data_container(IPHONE, "D1", "com.acme.App").expect("data");
    tree.install_bundle(IPHONE, "B2", "com.acme.Widget").expect("bundle");
    dir
}

fn xcsim(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("xcsim").expect("cargo bin");
    cmd.env_remove("RUST_LOG")
        .env_remove("XCSIM_DEFAULT_DEVICE")
        .arg("--root")
        .arg(root);
    cmd
}

fn stdout(cmd: &mut Command, code: i32) -> String {
    let output = cmd.assert().code(code).get_output().stdout.clone();
    String::from_utf8(output).expect("utf8 stdout")
}

fn stderr(cmd: &mut Command, code: i32) -> String {
    let output = cmd.assert().code(code).get_output().stderr.clone();
    String::from_utf8(output).expect("utf8 stderr")
}

#[test]
fn bundle_prints_data_directory() {
    let dir = simulators();
    let out = stdout(xcsim(dir.path()).args(["bundle", "App"]), 0);
    let expected = dir
        .path()
        .join(IPHONE)
        .join(DEVICE_APP_DATA_RELATIVE_PATH)
        .join("D1");
    assert_eq!(out.trim_end(), expected.display().to_string());
}

#[test]
fn bundle_without_data_directory_fails() {
    let dir = simulators();
    xcsim(dir.path()).args(["bundle", "Widget"]).assert().code(1);
    let out = stdout(xcsim(dir.path()).args(["bundle", "Widget", "--bundle-dir"]), 0);
    assert!(out.trim_end().ends_with("B2"));
}

#[test]
fn bundle_errors_map_to_exit_codes() {
    let dir = simulators();
    xcsim(dir.path()).args(["bundle", "acme.Ap"]).assert().code(1);
    xcsim(dir.path()).args(["bundle", "App", "--os", "iOS 9"]).assert().code(1);
    xcsim(dir.path()).args(["bundle", "com.acme"]).assert().code(1);
    xcsim(dir.path())
        .args(["bundle", "App", "--os", "iOS 9.2", "--device", "iPad Air"])
        .assert()
        .code(1);
}

#[test]
fn ambiguous_suffix_exits_with_three() {
    let dir = simulators();
    SimulatorTree::new(dir.path())
        .install_bundle(IPHONE, "B3", "org.other.App")
        .expect("bundle");
    xcsim(dir.path()).args(["bundle", "App"]).assert().code(3);
}

#[test]
fn list_single_device_prints_bundles() {
    let dir = simulators();
    let out = stdout(xcsim(dir.path()).args(["list", "iOS", "9.2,", "iPhone", "5s"]), 0);
    assert_eq!(out, "com.acme.App\ncom.acme.Widget\n");
}

#[test]
fn list_one_os_prints_device_names() {
    let dir = simulators();
    let out = stdout(xcsim(dir.path()).args(["list", "iOS 9.2"]), 0);
    assert_eq!(out, "iPad Air\niPhone 5s\n");
}

#[test]
fn list_without_match_shows_choices() {
    let dir = simulators();
    let err = stderr(xcsim(dir.path()).args(["list", "tvOS"]), 1);
    assert!(err.contains("No simulators matching 'tvOS'"));
    assert!(err.contains("Available simulator OS:\n iOS 9.2 (2 devices)\n"));
}

#[test]
fn unknown_device_lists_devices_of_the_os() {
    let dir = simulators();
    let err = stderr(xcsim(dir.path()).args(["bundle", "App", "--device", "iPhone 99"]), 1);
    assert!(err.contains("unknown device 'iPhone 99' for iOS 9.2"));
    assert!(err.contains("Available simulators for iOS 9.2:\n iPad Air\n iPhone 5s\n"));
}

#[test]
fn unknown_bundle_lists_installed_apps() {
    let dir = simulators();
    let err = stderr(xcsim(dir.path()).args(["bundle", "Nope"]), 1);
    assert!(err.contains("no bundle matching 'Nope'"));
    assert!(err.contains(
        "Applications installed on iPhone 5s iOS 9.2 simulator:\n com.acme.App\n com.acme.Widget\n"
    ));
}

#[test]
fn unknown_os_lists_available_oses() {
    let dir = simulators();
    let err = stderr(xcsim(dir.path()).args(["bundle", "App", "--os", "iOS 9"]), 1);
    assert!(err.contains("Available simulator OS:\n iOS 9.2\n"));
}

#[test]
fn list_rejects_three_components() {
    let dir = simulators();
    xcsim(dir.path()).args(["list", "a, b, c"]).assert().code(2);
}

#[test]
fn list_json_has_envelope() {
    let dir = simulators();
    let out = stdout(xcsim(dir.path()).args(["list", "--json", "iPad"]), 0);
    let value: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(value["pattern"], "iPad");
    assert_eq!(value["report"]["kind"], "bundles");
}

#[test]
fn os_listing_skips_unprovisioned_runtimes() {
    let dir = simulators();
    assert_eq!(stdout(xcsim(dir.path()).arg("os"), 0), "iOS 9.2\n");
    assert_eq!(stdout(xcsim(dir.path()).args(["os", "--default"]), 0), "iOS 9.2\n");
}

#[test]
fn devices_listing_uses_strict_os() {
    let dir = simulators();
    assert_eq!(
        stdout(xcsim(dir.path()).args(["devices", "--os", "iOS 9.2"]), 0),
        "iPad Air\niPhone 5s\n"
    );
    xcsim(dir.path()).args(["devices", "--os", "iOS 8.4"]).assert().code(1);
}

#[test]
fn missing_descriptor_exits_with_four() {
    let dir = tempdir().expect("tempdir");
    xcsim(dir.path()).arg("os").assert().code(4);
}
