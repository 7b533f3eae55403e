use std::process::Command;

fn binary() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kucoin-cli"));
    command
        .env("RUST_LOG", "error")
        .env_remove("KUCOIN_API_KEY")
        .env_remove("KUCOIN_API_SECRET")
        .env_remove("KUCOIN_API_PASSPHRASE")
        .env_remove("KUCOIN_API_KEY_VERSION");
    command
}

#[test]
fn cli_mode_with_config_and_dry_run_works() {
    let config_path = format!("{}/examples/config.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = binary()
        .arg("--config")
        .arg(config_path)
        .arg("--dry-run")
        .output()
        .expect("Failed to start kucoin-cli binary");

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn missing_config_file_fails() {
    let output = binary()
        .arg("--config")
        .arg("/nonexistent/kucoin.yaml")
        .arg("--dry-run")
        .output()
        .expect("Failed to start kucoin-cli binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load config"), "stderr: {stderr}");
}

#[test]
fn private_command_without_credentials_fails() {
    let config_path = format!("{}/examples/config.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = binary()
        .arg("--config")
        .arg(config_path)
        .arg("accounts")
        .output()
        .expect("Failed to start kucoin-cli binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("requires credentials"), "stderr: {stderr}");
}
