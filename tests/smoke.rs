use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("pt-covid-data").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn process_help_lists_run_date() {
    let mut cmd = Command::cargo_bin("pt-covid-data").expect("binary exists");
    let output = cmd.args(["process", "--help"]).assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("--run-date"));
}
