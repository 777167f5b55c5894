#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn habits(dir: &TempDir, owner: &str) -> Command {
    let mut cmd = Command::cargo_bin("habits").unwrap();
    cmd.current_dir(dir.path())
        .env("HABITS_ROOT", dir.path())
        .env("HABITS_OWNER", owner)
        .env_remove("RUST_LOG");
    cmd
}

fn json(dir: &TempDir, owner: &str, args: &[&str]) -> serde_json::Value {
    let out = habits(dir, owner).arg("--json").args(args).output().unwrap();
    assert!(
        out.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap()
}

fn init_with_workspace(dir: &TempDir, owner: &str) -> i64 {
    habits(dir, owner).arg("init").assert().success();
    json(dir, owner, &["workspace", "create", "Growth"])["id"]
        .as_i64()
        .unwrap()
}

// ---------------------------------------------------------------------------
// habits init / config
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_database() {
    let dir = TempDir::new().unwrap();
    habits(&dir, "alice").arg("init").assert().success();
    assert!(dir.path().join(".habits/config.yaml").exists());
    assert!(dir.path().join(".habits/habits.db").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    habits(&dir, "alice").arg("init").assert().success();
    habits(&dir, "alice")
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    habits(&dir, "alice")
        .args(["habit", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn config_validate_default_ok() {
    let dir = TempDir::new().unwrap();
    habits(&dir, "alice").arg("init").assert().success();
    habits(&dir, "alice")
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config OK"));
}

#[test]
fn missing_owner_is_rejected() {
    let dir = TempDir::new().unwrap();
    habits(&dir, "alice").arg("init").assert().success();
    let mut cmd = Command::cargo_bin("habits").unwrap();
    cmd.env("HABITS_ROOT", dir.path())
        .env_remove("HABITS_OWNER")
        .args(["habit", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner is required"));
}

// ---------------------------------------------------------------------------
// habits habit ...
// ---------------------------------------------------------------------------

#[test]
fn create_and_list_habit() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    habits(&dir, "alice")
        .args(["habit", "create", "--workspace", &ws, "Morning", "pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created habit"));

    habits(&dir, "alice")
        .args(["habit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning pages"))
        .stdout(predicate::str::contains("0/1"));
}

#[test]
fn create_in_foreign_workspace_fails() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "bob").to_string();
    habits(&dir, "alice")
        .args(["habit", "create", "--workspace", &ws, "Sneaky"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not owned"));
}

#[test]
fn daily_checkin_caps_at_target() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    let habit = json(
        &dir,
        "alice",
        &["habit", "create", "--workspace", &ws, "--target", "2", "Water"],
    );
    let id = habit["id"].as_i64().unwrap().to_string();

    let counts: Vec<i64> = (0..3)
        .map(|_| json(&dir, "alice", &["habit", "checkin", &id])["count"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, [1, 2, 2]);

    let detail = json(&dir, "alice", &["habit", "show", &id]);
    assert_eq!(detail["period_count"], 2);
    assert_eq!(detail["today_count"], 2);
    assert_eq!(detail["completed"], true);
}

#[test]
fn weekly_checkin_is_uncapped() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    let habit = json(
        &dir,
        "alice",
        &[
            "habit", "create", "--workspace", &ws, "--frequency", "weekly", "--target", "1",
            "Review",
        ],
    );
    assert_eq!(habit["frequency"], "Weekly");
    let id = habit["id"].as_i64().unwrap().to_string();
    json(&dir, "alice", &["habit", "checkin", &id]);
    let second = json(&dir, "alice", &["habit", "checkin", &id]);
    assert_eq!(second["count"], 2);
}

#[test]
fn unknown_frequency_becomes_daily() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    let habit = json(
        &dir,
        "alice",
        &["habit", "create", "--workspace", &ws, "--frequency", "hourly", "Blink"],
    );
    assert_eq!(habit["frequency"], "Daily");
}

#[test]
fn other_owner_cannot_touch_habit() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    let habit = json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Read"]);
    let id = habit["id"].as_i64().unwrap().to_string();

    for args in [
        vec!["habit", "checkin", id.as_str()],
        vec!["habit", "show", id.as_str()],
        vec!["habit", "toggle", id.as_str()],
        vec!["habit", "delete", id.as_str()],
        vec!["habit", "edit", id.as_str(), "--title", "Mine now"],
    ] {
        habits(&dir, "bob")
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("habit not found"));
    }

    let detail = json(&dir, "alice", &["habit", "show", &id]);
    assert_eq!(detail["title"], "Read");
    assert_eq!(detail["today_count"], 0);
}

#[test]
fn list_order_and_toggle() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    json(&dir, "alice", &["habit", "create", "--workspace", &ws, "--frequency", "weekly", "Zeta"]);
    json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Alpha"]);
    let beta = json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Beta"]);
    let beta_id = beta["id"].as_i64().unwrap().to_string();
    let toggled = json(&dir, "alice", &["habit", "toggle", &beta_id]);
    assert_eq!(toggled["is_active"], false);

    let list = json(&dir, "alice", &["habit", "list"]);
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Alpha", "Zeta", "Beta"]);
}

#[test]
fn delete_then_show_fails() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    let habit = json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Read"]);
    let id = habit["id"].as_i64().unwrap().to_string();
    habits(&dir, "alice").args(["habit", "delete", &id]).assert().success();
    habits(&dir, "alice")
        .args(["habit", "show", &id])
        .assert()
        .failure();
}

#[test]
fn strategy_link_must_share_workspace() {
    let dir = TempDir::new().unwrap();
    let ws1 = init_with_workspace(&dir, "alice").to_string();
    let ws2 = json(&dir, "alice", &["workspace", "create", "Other"])["id"]
        .as_i64()
        .unwrap()
        .to_string();
    let strategy = json(&dir, "alice", &["strategy", "create", "--workspace", &ws2, "Expand"]);
    let sid = strategy["id"].as_i64().unwrap().to_string();

    habits(&dir, "alice")
        .args(["habit", "create", "--workspace", &ws1, "--strategy", &sid, "Call"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strategy"));
    habits(&dir, "alice")
        .args(["habit", "create", "--workspace", &ws2, "--strategy", &sid, "Call"])
        .assert()
        .success();
}

#[test]
fn list_filters_by_search() {
    let dir = TempDir::new().unwrap();
    let ws = init_with_workspace(&dir, "alice").to_string();
    json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Read", "papers"]);
    json(&dir, "alice", &["habit", "create", "--workspace", &ws, "Stretch"]);
    let list = json(&dir, "alice", &["habit", "list", "--search", "paper"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Read papers");
}
