mod common;

use common::run_script;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const SETUP: &str = "book new \"Community Fund\"\nlogin admin\n";

#[test]
fn script_mode_posts_and_reports() {
    let home = tempfile::tempdir().unwrap();
    let script = format!(
        "{SETUP}journal post 2024-01-05 \"January fees\" Cash dr 100 \"Member Fees\" cr 100\n\
         account list\nreport trial\nexit\n"
    );

    run_script(home.path(), &script)
        .success()
        .stdout(contains("New books `Community Fund` created with 5 accounts."))
        .stdout(contains("Signed in as `admin`."))
        .stdout(contains("Journal entry #1 posted (2 lines, 100.00)."))
        .stdout(contains("-100.00"))
        .stdout(contains("Trial balance agrees."));

    let stored = std::fs::read_to_string(home.path().join("books").join("community_fund.json"))
        .expect("books file");
    assert!(stored.contains("\"January fees\""));
}

#[test]
fn unbalanced_entry_reports_the_mismatch() {
    let home = tempfile::tempdir().unwrap();
    let script = format!(
        "{SETUP}journal post 2024-01-05 - Cash dr 100 \"Member Fees\" cr 50\njournal list\n"
    );

    run_script(home.path(), &script)
        .success()
        .stdout(contains("Journal entry is unbalanced: debits 100 != credits 50"))
        .stdout(contains("No journal entries."));
}

#[test]
fn posting_without_login_is_refused() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "book new Fund\njournal post 2024-01-05 - Cash dr 1 Bank cr 1\n",
    )
    .success()
    .stdout(contains("Not signed in"))
    .stdout(contains("posted").not());
}

#[test]
fn cash_book_carries_the_balance_forward() {
    let home = tempfile::tempdir().unwrap();
    let script = format!(
        "{SETUP}cash add 2024-02-01 receipt 500 Donations\n\
         cash add 2024-02-03 payment 200 Hall rent\ncash balance\ncash check\n"
    );

    run_script(home.path(), &script)
        .success()
        .stdout(contains("Balance 500.00."))
        .stdout(contains("Balance 300.00."))
        .stdout(contains("Cash balance: 300.00 USD"))
        .stdout(contains("Cash book balances are consistent."));
}

#[test]
fn medicaid_requests_follow_their_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let script = format!(
        "{SETUP}member add \"Omar Said\" 2022-01-01\n\
         medicaid submit 1 2024-04-01 300 Hospital bill\n\
         medicaid approve 1 250\nmedicaid approve 1 10\nmedicaid reject 9\n\
         medicaid list approved\n"
    );

    run_script(home.path(), &script)
        .success()
        .stdout(contains("Member #1 `Omar Said` added."))
        .stdout(contains("Medicaid request #1 submitted (Pending)."))
        .stdout(contains("Medicaid request #1 approved."))
        .stdout(contains("cannot move request from Approved to Approved"))
        .stdout(contains("No medicaid request #9."))
        .stdout(contains("250.00"));
}

#[test]
fn vouchers_and_income_reports() {
    let home = tempfile::tempdir().unwrap();
    let script = format!(
        "{SETUP}voucher receipt 2024-01-10 \"Member Fees\" 100 January dues\n\
         voucher receipt 2024-01-20 \"Member Fees\" 50\n\
         voucher receipt 2024-02-02 \"Member Fees\" 30\n\
         voucher list receipt\nreport income 2024-01-01 2024-01-31\nreport income 2024\n"
    );

    run_script(home.path(), &script)
        .success()
        .stdout(contains("Receipt voucher #1 issued as journal entry #1."))
        .stdout(contains("January dues"))
        .stdout(contains("Income statement 2024-01-01 .. 2024-01-31"))
        .stdout(contains("150.00"))
        .stdout(contains("Income statement 2024-01-01 .. 2024-12-31"))
        .stdout(contains("180.00"));
}

#[test]
fn books_and_operator_are_reopened_next_session() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), &format!("{SETUP}cash add 2024-02-01 receipt 75\n")).success();

    run_script(home.path(), "login\ncash balance\nbook info\n")
        .success()
        .stdout(contains("Loaded books `Community Fund`."))
        .stdout(contains("Signed in as `admin`."))
        .stdout(contains("Cash balance: 75.00 USD"))
        .stdout(contains("stored as `Community Fund`"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "jurnal list\nhelp voucher\n")
        .success()
        .stdout(contains("Unknown command `jurnal`"))
        .stdout(contains("Did you mean `journal`?"))
        .stdout(contains("usage: voucher <receipt|payment> <date>"))
        .stdout(contains("usage: voucher list [receipt|payment]"));
}

#[test]
fn commands_without_books_explain_how_to_start() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "account list\n")
        .success()
        .stdout(contains("No books loaded."))
        .stdout(contains("book new"));
}

#[test]
fn version_and_config_commands() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "version\nconfig set currency egp\nconfig show\nconfig set theme dark\n",
    )
    .success()
    .stdout(contains("Akhra Books"))
    .stdout(contains("Schema ver"))
    .stdout(contains("`currency` updated."))
    .stdout(contains("EGP"))
    .stdout(contains("ERROR"));
}
