//! Integration tests for ddcvolume

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and runtime directory
    fn ddcvolume(temp: &TempDir) -> Command {
        let config = temp.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "[ddcutil]\npath = \"false\"\nsudo = false\n\n[notification]\nenabled = false\n\n[state]\ndir = \"{}\"\nlock_timeout_ms = 1000\n",
                state_dir(temp).display()
            ),
        )
        .unwrap();

        let mut cmd = cargo_bin_cmd!("ddcvolume");
        cmd.env("DDCVOLUME_CONFIG", &config)
            .env_remove("DDCVOLUME_DDCUTIL");
        cmd
    }

    fn state_dir(temp: &TempDir) -> std::path::PathBuf {
        temp.path().join("state")
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        ddcvolume(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--set"))
            .stdout(predicate::str::contains("--ddcutil"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        ddcvolume(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ddcvolume"));
    }

    #[test]
    fn action_required() {
        let temp = TempDir::new().unwrap();
        ddcvolume(&temp).assert().failure();
    }

    #[test]
    fn invalid_set_fails_before_device_access() {
        let temp = TempDir::new().unwrap();
        ddcvolume(&temp)
            .args(["--set", "loud"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid volume"));

        assert!(!state_dir(&temp).join("volume").exists());
    }

    #[test]
    fn get_uses_warm_cache() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(state_dir(&temp)).unwrap();
        std::fs::write(state_dir(&temp).join("volume"), "37").unwrap();

        ddcvolume(&temp)
            .args(["--get", "--bus", "1"])
            .assert()
            .success()
            .stdout("37\n");
    }

    #[test]
    fn cold_get_reports_read_failure() {
        let temp = TempDir::new().unwrap();

        ddcvolume(&temp)
            .args(["--get", "--bus", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read volume"));

        assert!(!state_dir(&temp).join("volume").exists());
    }

    #[test]
    fn set_write_failure_keeps_cache() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(state_dir(&temp)).unwrap();
        std::fs::write(state_dir(&temp).join("volume"), "50").unwrap();

        ddcvolume(&temp)
            .args(["--set", "-10", "--bus", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to write volume"));

        let cached = std::fs::read_to_string(state_dir(&temp).join("volume")).unwrap();
        assert_eq!(cached, "40");
        assert!(!state_dir(&temp).join("commit").exists());
    }

    #[test]
    fn notification_failure_still_commits() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(state_dir(&temp)).unwrap();
        std::fs::write(state_dir(&temp).join("volume"), "50").unwrap();
        let config = temp.path().join("notify.toml");
        std::fs::write(
            &config,
            format!(
                "[ddcutil]\npath = \"true\"\nsudo = false\n\n[notification]\nenabled = true\n\n[state]\ndir = \"{}\"\n",
                state_dir(&temp).display()
            ),
        )
        .unwrap();

        cargo_bin_cmd!("ddcvolume")
            .env("DDCVOLUME_CONFIG", &config)
            .env("DBUS_SESSION_BUS_ADDRESS", "unix:path=/nonexistent")
            .env_remove("DDCVOLUME_DDCUTIL")
            .args(["--set", "+5", "--bus", "1"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Notification failed"));

        let cached = std::fs::read_to_string(state_dir(&temp).join("volume")).unwrap();
        let committed = std::fs::read_to_string(state_dir(&temp).join("commit")).unwrap();
        assert_eq!(cached, "55");
        assert_eq!(committed, "55");
    }

    #[test]
    fn missing_device_reported() {
        let temp = TempDir::new().unwrap();
        let sysfs = temp.path().join("sysfs");
        std::fs::create_dir_all(&sysfs).unwrap();
        let config = temp.path().join("discover.toml");
        std::fs::write(
            &config,
            format!(
                "[device]\nsysfs_dir = \"{}\"\n\n[state]\ndir = \"{}\"\n",
                sysfs.display(),
                state_dir(&temp).display()
            ),
        )
        .unwrap();

        cargo_bin_cmd!("ddcvolume")
            .args(["--get", "--config"])
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to find i2c device"));
    }
}
