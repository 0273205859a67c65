//! End-to-end tests for the traction CLI.
//!
//! These run the real binary and check stdout, stderr and exit status for
//! both commands, every output format, config files and error paths.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a Command for the traction binary with a clean environment.
#[allow(deprecated)]
fn traction_cmd() -> Command {
    let mut cmd = Command::cargo_bin("traction").unwrap();
    for var in [
        "TRACTION_CONFIG",
        "TRACTION_MASS",
        "TRACTION_FRICTION",
        "TRACTION_FORCE",
        "TRACTION_DURATION",
        "TRACTION_SLOW",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Predict
// =============================================================================

mod predict {
    use super::*;

    #[test]
    fn test_predict_default_table() {
        traction_cmd()
            .arg("predict")
            .assert()
            .success()
            .stdout(predicate::str::contains("total distance"))
            .stdout(predicate::str::contains("3.750 m"))
            .stdout(predicate::str::contains("2.500 s"));
    }

    #[test]
    fn test_predict_json_with_flags() {
        let value = stdout_json(traction_cmd().args([
            "predict", "--mass", "1", "--friction", "0.5", "--force", "3", "--duration", "2",
            "--format", "json",
        ]));
        // Stuck: 3 N cannot beat 5 N of friction
        assert_eq!(value["prediction"]["total_distance"], 0.0);
        assert_eq!(value["prediction"]["total_time"], 2.0);
    }

    #[test]
    fn test_predict_csv() {
        traction_cmd()
            .args(["predict", "--format", "csv"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("mass,friction_coefficient"));
    }

    #[test]
    fn test_predict_reads_env() {
        let value = stdout_json(
            traction_cmd()
                .env("TRACTION_MASS", "4")
                .args(["predict", "--format", "json"]),
        );
        assert_eq!(value["parameters"]["mass"], 4.0);
    }
}

// =============================================================================
// Run
// =============================================================================

mod run {
    use super::*;

    #[test]
    fn test_run_default_table() {
        traction_cmd()
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("force off  x = 1.500 m"))
            .stdout(predicate::str::contains("came to rest"));
    }

    #[test]
    fn test_run_json_reaches_prediction() {
        let value = stdout_json(traction_cmd().args(["run", "--format", "json"]));
        assert_eq!(value["motion"], "ceased");
        let x = value["final_state"]["position"].as_f64().unwrap();
        assert!((x - 3.75).abs() < 1e-9);
        assert_eq!(value["final_state"]["phase"], "stopped");
    }

    #[test]
    fn test_run_slow_motion_same_distance() {
        let value = stdout_json(traction_cmd().args([
            "run", "--slow", "--format", "json", "--sample-every", "50",
        ]));
        let x = value["final_state"]["position"].as_f64().unwrap();
        let wall = value["wall_time"].as_f64().unwrap();
        assert!((x - 3.75).abs() < 1e-9);
        assert!(wall > 9.9);
    }

    #[test]
    fn test_run_csv_series_option() {
        traction_cmd()
            .args(["run", "--format", "csv", "--series", "x"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("frame,wall,time"))
            .stdout(predicate::str::contains(",stopped"));
    }

    #[test]
    fn test_run_frictionless_hits_wall_limit() {
        traction_cmd()
            .args(["run", "--friction", "0", "--max-seconds", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("still moving at wall-time limit"))
            .stdout(predicate::str::contains("stop       not reached"));
    }

    #[test]
    fn test_run_zero_duration_settles_at_origin() {
        let value =
            stdout_json(traction_cmd().args(["run", "--duration", "0", "--format", "json"]));
        assert_eq!(value["motion"], "ceased");
        assert!(value["markers"]["force_off"].is_null());
        assert_eq!(value["markers"]["stop"]["position"], 0.0);
        assert_eq!(value["markers"]["stop"]["velocity"], 0.0);
        assert_eq!(value["frames"].as_array().unwrap().len(), 2);
    }
}

// =============================================================================
// Configuration
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_file_applies() {
        let file = config_file(
            "[parameters]\nmass = 1.0\nfriction_coefficient = 0.5\napplied_force = 3.0\n",
        );
        let value = stdout_json(
            traction_cmd()
                .arg("--config")
                .arg(file.path())
                .args(["predict", "--format", "json"]),
        );
        assert_eq!(value["parameters"]["applied_force"], 3.0);
        assert_eq!(value["prediction"]["cutoff_velocity"], 0.0);
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let file = config_file("[parameters]\napplied_force = 3.0\n");
        let value = stdout_json(
            traction_cmd()
                .env("TRACTION_CONFIG", file.path())
                .args(["predict", "--force", "20", "--format", "json"]),
        );
        assert_eq!(value["parameters"]["applied_force"], 20.0);
    }

    #[test]
    fn test_run_settings_from_config() {
        let file = config_file("[run]\nsample_every = 1000\n");
        let value = stdout_json(
            traction_cmd()
                .arg("--config")
                .arg(file.path())
                .args(["run", "--format", "json"]),
        );
        // Initial frame plus the frame where the body stopped
        assert_eq!(value["frames"].as_array().unwrap().len(), 2);
    }
}

// =============================================================================
// Errors
// =============================================================================

mod errors {
    use super::*;

    #[test]
    fn test_invalid_mass_fails() {
        traction_cmd()
            .args(["predict", "--mass=0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid parameter mass"));
    }

    #[test]
    fn test_missing_config_file_fails() {
        traction_cmd()
            .args(["--config", "/definitely/not/here.toml", "predict"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read config file"));
    }

    #[test]
    fn test_malformed_config_fails() {
        let file = config_file("[parameters\nmass = ");
        traction_cmd()
            .arg("--config")
            .arg(file.path())
            .arg("predict")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to parse config"));
    }

    #[test]
    fn test_invalid_run_setting_fails() {
        traction_cmd()
            .args(["run", "--sample-every", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid setting sample_every"));
    }

    #[test]
    fn test_unbounded_wall_limit_fails() {
        traction_cmd()
            .args(["run", "--max-seconds", "1e9"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid setting max_seconds"));
    }

    #[test]
    fn test_zero_wall_limit_fails() {
        traction_cmd()
            .args(["run", "--max-seconds", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid setting max_seconds"));
    }

    #[test]
    fn test_unknown_series_fails() {
        traction_cmd()
            .args(["run", "--series", "jerk"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown series"));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        traction_cmd().assert().failure();
    }
}

// =============================================================================
// Logging
// =============================================================================

mod logging {
    use super::*;

    #[test]
    fn test_logs_go_to_stderr() {
        traction_cmd()
            .args(["-v", "run", "--format", "json"])
            .assert()
            .success()
            .stderr(predicate::str::contains("body came to rest"))
            .stdout(predicate::str::contains("body came to rest").not());
    }

    #[test]
    fn test_quiet_by_default() {
        traction_cmd()
            .arg("predict")
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}
