//! End-to-end CLI tests.
//!
//! Each test gets its own HOME so the database and config live in a
//! temporary directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn momentum(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("momentum").unwrap();
    cmd.env("HOME", home.path());
    cmd
}

fn seeded_home() -> TempDir {
    let home = TempDir::new().unwrap();
    momentum(&home).arg("seed").assert().success();
    home
}

fn json_output(home: &TempDir, args: &[&str]) -> Value {
    let output = momentum(home)
        .args(args)
        .args(["--output", "json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_seed_creates_profile_and_assignments() {
    let home = TempDir::new().unwrap();

    let value = json_output(&home, &["seed"]);
    assert_eq!(value["status"], "success");
    assert_eq!(value["tasks"], 5);
    assert_eq!(value["rewards"], 5);

    // Four dailies every day, plus the weekly task on Mondays.
    let assigned = value["assigned_today"].as_u64().unwrap();
    assert!(assigned == 4 || assigned == 5, "assigned {assigned}");
}

#[test]
fn test_seed_refuses_second_run() {
    let home = seeded_home();

    momentum(&home)
        .arg("seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    momentum(&home).args(["seed", "--force"]).assert().success();
}

#[test]
fn test_tasks_lists_todays_assignments() {
    let home = seeded_home();

    let value = json_output(&home, &["tasks"]);
    let count = value["count"].as_u64().unwrap();
    assert!(count >= 4);

    let tasks = value["tasks"].as_array().unwrap();
    assert!(tasks.iter().all(|t| t["status"] == "pending"));
    assert!(tasks
        .iter()
        .any(|t| t["title"] == "Take morning medication"));
}

#[test]
fn test_complete_pays_out_and_is_idempotent() {
    let home = seeded_home();

    // Task 1 is "Take morning medication", worth 5 tokens.
    let value = json_output(&home, &["complete", "1"]);
    assert_eq!(value["status"], "success");
    assert_eq!(value["tokens_earned"], 5);
    assert_eq!(value["new_balance"], 5);

    // Completing it again must not pay twice.
    let repeat = json_output(&home, &["complete", "1"]);
    assert_eq!(repeat["status"], "error");
    assert_eq!(repeat["message"], "Task already completed");

    let wallet = json_output(&home, &["wallet"]);
    assert_eq!(wallet["current_balance"], 5);
    assert_eq!(wallet["transactions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_complete_unknown_task_is_an_error_result() {
    let home = seeded_home();

    let value = json_output(&home, &["complete", "999"]);
    assert_eq!(value["status"], "error");
    assert_eq!(value["message"], "Task not found");
}

#[test]
fn test_redeem_insufficient_balance_leaves_wallet_unchanged() {
    let home = seeded_home();

    // Balance 5, the ADHD Workbook (reward 5) costs 50.
    json_output(&home, &["complete", "1"]);

    let value = json_output(&home, &["redeem", "5"]);
    assert_eq!(value["status"], "error");
    assert_eq!(value["message"], "Insufficient token balance");

    let wallet = json_output(&home, &["wallet"]);
    assert_eq!(wallet["current_balance"], 5);
    assert_eq!(wallet["transactions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_redeem_success_appends_spend_transaction() {
    let home = seeded_home();

    // Earn enough for the 12-token Weekly Progress Report (reward 4).
    json_output(&home, &["complete", "1"]); // +5
    json_output(&home, &["complete", "2"]); // +10

    let value = json_output(&home, &["redeem", "4"]);
    assert_eq!(value["status"], "success");
    assert_eq!(value["tokens_spent"], 12);
    assert_eq!(value["new_balance"], 3);

    let wallet = json_output(&home, &["wallet"]);
    assert_eq!(wallet["current_balance"], 3);
    let transactions = wallet["transactions"].as_array().unwrap();
    assert_eq!(transactions[0]["kind"], "spend");
    assert_eq!(
        transactions[0]["description"],
        "Redeemed: Weekly Progress Report"
    );
}

#[test]
fn test_wallet_balance_matches_signed_transaction_sum() {
    let home = seeded_home();

    json_output(&home, &["complete", "1"]);
    json_output(&home, &["complete", "3"]);
    json_output(&home, &["redeem", "4"]);

    let wallet = json_output(&home, &["wallet"]);
    let balance = wallet["current_balance"].as_i64().unwrap();

    let signed_sum: i64 = wallet["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            let amount = t["amount"].as_i64().unwrap();
            if t["kind"] == "spend" {
                -amount
            } else {
                amount
            }
        })
        .sum();

    assert_eq!(balance, signed_sum);
}

#[test]
fn test_stats_aggregates_today() {
    let home = seeded_home();
    json_output(&home, &["complete", "1"]);

    let value = json_output(&home, &["stats", "--days", "3"]);
    let days = value["days"].as_array().unwrap();
    assert_eq!(days.len(), 3);

    let today = &days[2];
    assert_eq!(today["earned"].as_u64().unwrap(), 5);
    assert_eq!(today["tasks_completed"], 1);
}

#[test]
fn test_rewards_lists_catalog_with_balance() {
    let home = seeded_home();

    let value = json_output(&home, &["rewards"]);
    assert_eq!(value["user_balance"], 0);
    assert_eq!(value["rewards"].as_array().unwrap().len(), 5);
}

#[test]
fn test_completions_emits_script() {
    let home = TempDir::new().unwrap();

    momentum(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("momentum"));
}

#[test]
fn test_tasks_before_seed_fails_with_hint() {
    let home = TempDir::new().unwrap();

    momentum(&home)
        .arg("tasks")
        .assert()
        .failure()
        .stderr(predicate::str::contains("momentum seed"));
}
