//! Integration tests for the dp-cli commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a two-character roster.
fn test_roster() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("roster.json"),
        r#"{
  "characters": [
    {
      "name": "Alice",
      "attributes": { "strength": 3, "dexterity": 2, "wits": 3 },
      "skills": { "brawl": 2, "crafts": 3, "weaponry": 2 },
      "advantages": { "defense": 3 },
      "merits": { "patient": 1 },
      "specialties": { "weaponry": "Swords" },
      "wound_penalty": -1
    },
    {
      "name": "Bob",
      "attributes": { "strength": 2, "dexterity": 3, "stamina": 2 },
      "skills": { "athletics": 2 },
      "advantages": { "defense": 2 }
    }
  ]
}
"#,
    )
    .unwrap();
    dir
}

fn dp(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dp").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_direct_pool() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "42", "roll", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alice rolls 5")
                .and(predicate::str::contains("Dice: ["))
                .and(predicate::str::contains("successes").or(predicate::str::contains("success"))),
        );
}

#[test]
fn roll_same_seed_same_dice() {
    let dir = test_roster();
    let first = dp(&dir)
        .args(["-a", "Alice", "-s", "7", "roll", "strength+brawl"])
        .output()
        .unwrap();
    let second = dp(&dir)
        .args(["-a", "Alice", "-s", "7", "roll", "strength+brawl"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roll_shows_trait_breakdown_and_wounds() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "1", "roll", "strength+brawl-1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("strength (3) + brawl (2) - 1 - 1 wounds")
                .and(predicate::str::contains("= 3 dice")),
        );
}

#[test]
fn roll_secret_hides_ratings() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "1", "roll", "/secret", "strength+brawl"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("strength + brawl")
                .and(predicate::str::contains("strength (3)").not()),
        );
}

#[test]
fn roll_specialty_adds_die() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "3", "roll", "/specialty", "strength+weaponry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ 1 specialty (Swords)"));
}

#[test]
fn roll_reflexive_ignores_wounds() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "3", "roll", "/reflex", "wits"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("wits (3) = 3 dice")
                .and(predicate::str::contains("wounds").not()),
        );
}

#[test]
fn roll_missing_trait_names_character() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Bob", "roll", "strength+weaponry"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bob doesn't have 'weaponry' set"));
}

#[test]
fn roll_unknown_switch_fails() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "roll", "/bogus", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown switch '/bogus'"));
}

#[test]
fn roll_needs_actor_with_several_characters() {
    let dir = test_roster();
    dp(&dir)
        .args(["roll", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--actor"));
}

#[test]
fn roll_missing_roster_fails() {
    let dir = TempDir::new().unwrap();
    dp(&dir)
        .args(["roll", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read roster"));
}

// ---------------------------------------------------------------------------
// contests
// ---------------------------------------------------------------------------

#[test]
fn roll_vs_trait_subtracts_contest() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "5", "roll", "strength+brawl", "vs", "bob:defense"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- 2 contest"));
}

#[test]
fn roll_vs_unknown_target_fails() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "roll", "strength+brawl", "vs", "carol:defense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid contest target: carol"));
}

#[test]
fn roll_opposed_reports_both_sides() {
    let dir = test_roster();
    dp(&dir)
        .args([
            "-a",
            "Alice",
            "-s",
            "11",
            "roll",
            "/opposed",
            "strength+brawl",
            "vs",
            "bob:strength+athletics",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alice rolls")
                .and(predicate::str::contains("Bob rolls"))
                .and(predicate::str::contains("wins by").or(predicate::str::contains("Tie"))),
        );
}

#[test]
fn roll_opposed_without_target_fails() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "roll", "/opposed", "strength+brawl", "vs", "3"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// extended
// ---------------------------------------------------------------------------

#[test]
fn roll_extended_single_roll_finishes() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "9", "roll", "/extended", "dexterity+crafts=5", "rolls:1"])
        .write_stdin("2\n3\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Extended action:")
                .and(predicate::str::contains("Roll #1"))
                .and(predicate::str::contains("Cumulative:"))
                .and(predicate::str::contains("successes in 1 of 1 rolls")),
        );
}

#[test]
fn roll_extended_closed_stdin_abandons_or_finishes() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "-s", "4", "roll", "/extended", "strength+crafts=20"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ABANDONED:")
                .or(predicate::str::contains("INCOMPLETE:"))
                .or(predicate::str::contains("SUCCESS:")),
        );
}

#[test]
fn roll_extended_target_too_low_fails() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "roll", "/extended", "dexterity+crafts=3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 5 successes"));
}

#[test]
fn roll_extended_too_many_rolls_fails() {
    let dir = test_roster();
    // dexterity 2 + crafts 3 + patient 2 = 7
    dp(&dir)
        .args(["-a", "Alice", "roll", "/extended", "dexterity+crafts=5", "rolls:8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("up to 7 rolls"));
}

#[test]
fn roll_extended_needs_skill() {
    let dir = test_roster();
    dp(&dir)
        .args(["-a", "Alice", "roll", "/extended", "strength=5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("attribute + skill"));
}

// ---------------------------------------------------------------------------
// sheet / conditions
// ---------------------------------------------------------------------------

#[test]
fn sheet_lists_roster() {
    let dir = test_roster();
    dp(&dir)
        .arg("sheet")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alice")
                .and(predicate::str::contains("Bob"))
                .and(predicate::str::contains("2 characters")),
        );
}

#[test]
fn sheet_shows_character() {
    let dir = test_roster();
    dp(&dir)
        .args(["sheet", "alice"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("weaponry")
                .and(predicate::str::contains("Swords"))
                .and(predicate::str::contains("Wound penalty: -1")),
        );
}

#[test]
fn sheet_unknown_character_fails() {
    let dir = test_roster();
    dp(&dir)
        .args(["sheet", "carol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("actor not found"));
}

#[test]
fn conditions_lists_catalog() {
    let dir = TempDir::new().unwrap();
    dp(&dir)
        .arg("conditions")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Confused")
                .and(predicate::str::contains("conditions")),
        );
}
