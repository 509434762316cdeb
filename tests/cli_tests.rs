use assert_cmd::Command;
use predicates::str::contains as str_contains;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("CALENDAR_STORE", "memory")
        .env("CALENDAR_FIXED_NOW", "2025-01-06T12:00:00")
        .env("RUST_LOG", "warn")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_lists_seeded_events() {
    run_cli("register\nseed\ntoday\nday 1\nday 3\nquit\n")
        .success()
        .stdout(str_contains("Added 4 test events."))
        .stdout(str_contains("Dziś trwa Spotkanie do 12:30"))
        .stdout(str_contains("Dziś o 14:00 Rozmowa z klientem"))
        .stdout(str_contains("Jutro o 13:00 Lekarz"))
        .stdout(str_contains(
            "W czwartek, 9 stycznia o 13:00 Planowanie projektu",
        ));
}

#[test]
fn cli_adds_event_with_multi_word_title() {
    run_cli("register\nadd 2025-01-08T09:15 2025-01-08T10:00 Przegląd auta\nday 2\nquit\n")
        .success()
        .stdout(str_contains("Added 'Przegląd auta'."))
        .stdout(str_contains("Pojutrze o 09:15 Przegląd auta"));
}

#[test]
fn cli_keeps_title_spacing() {
    run_cli("register\nadd  2025-01-08T09:15   2025-01-08T10:00   Przegląd  auta\nday 2\nadd 2025-01-08T09:15 2025-01-08T10:00\nquit\n")
        .success()
        .stdout(str_contains("Added 'Przegląd  auta'."))
        .stdout(str_contains("Pojutrze o 09:15 Przegląd  auta"))
        .stdout(str_contains("Usage: add <start> <end> <title...>"));
}

#[test]
fn cli_requires_active_user() {
    run_cli("today\nuser 0123456789abcdef\nquit\n")
        .success()
        .stdout(str_contains("No active user."))
        .stdout(str_contains("User 0123456789abcdef not found."));
}

#[test]
fn cli_reports_bad_input() {
    run_cli("register\nday jutro\nadd nope 2025-01-08T10:00 Coś\ntoday\nquit\n")
        .success()
        .stdout(str_contains("Invalid offset"))
        .stdout(str_contains("Error: invalid timestamp 'nope'"))
        .stdout(str_contains("(no events)"));
}

#[test]
#[allow(deprecated)]
fn cli_rejects_unknown_store() {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("CALENDAR_STORE", "postgres")
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(str_contains("CALENDAR_STORE"));
}
