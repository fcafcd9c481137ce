use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{book, init_db_with_data, rts, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    rts()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rts()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Employees:"))
        .stdout(contains("Time entries:"));
}

#[test]
fn test_db_check_and_migrate_are_idempotent() {
    let db_path = setup_test_db("cli_db_check");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "db", "--migrate", "--check"])
        .assert()
        .success()
        .stdout(contains("Schema already up to date"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_first_admin_needs_no_identity_but_later_ones_do() {
    let db_path = setup_test_db("cli_bootstrap");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "project", "add", "--name", "Gemini"])
        .assert()
        .failure()
        .stderr(contains("Unauthorized"));

    rts()
        .args([
            "--db", &db_path, "--as", "2", "project", "add", "--name", "Gemini",
        ])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));

    rts()
        .args([
            "--db", &db_path, "--as", "1", "project", "add", "--name", "Gemini",
        ])
        .assert()
        .success()
        .stdout(contains("Project #2 added"));
}

#[test]
fn test_employee_list_search_and_paging() {
    let db_path = setup_test_db("cli_employee_list");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "--as", "1", "employee", "list", "--search", "BOB"])
        .assert()
        .success()
        .stdout(contains("bob@example.com"))
        .stdout(contains("ada@example.com").not());

    rts()
        .args([
            "--db", &db_path, "--as", "1", "employee", "list", "--per-page", "1", "--page",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("Bob Builder"))
        .stdout(contains("Ada Admin").not())
        .stdout(contains("page 2/2"));

    rts()
        .args([
            "--db", &db_path, "--as", "1", "employee", "list", "--sort", "name", "--desc",
        ])
        .assert()
        .success()
        .stdout(contains("Bob Builder"));
}

#[test]
fn test_employee_list_unknown_sort_column() {
    let db_path = setup_test_db("cli_employee_sort");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "--as", "1", "employee", "list", "--sort", "salary"])
        .assert()
        .failure()
        .stderr(contains("Invalid sort column"));
}

#[test]
fn test_employee_sees_only_themselves() {
    let db_path = setup_test_db("cli_employee_self");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "--as", "2", "employee", "list"])
        .assert()
        .success()
        .stdout(contains("bob@example.com"))
        .stdout(contains("ada@example.com").not());

    rts()
        .args(["--db", &db_path, "--as", "2", "employee", "show", "1"])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));
}

#[test]
fn test_duplicate_email_is_a_conflict() {
    let db_path = setup_test_db("cli_duplicate_email");
    init_db_with_data(&db_path);

    rts()
        .args([
            "--db", &db_path, "--as", "1", "employee", "add", "--name", "Bobby", "--email",
            "BOB@example.com",
        ])
        .assert()
        .failure()
        .stderr(contains("already registered"));
}

#[test]
fn test_last_admin_cannot_be_removed() {
    let db_path = setup_test_db("cli_last_admin");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "--as", "1", "employee", "del", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("last active admin"));

    rts()
        .args([
            "--db", &db_path, "--as", "1", "employee", "edit", "1", "--role", "employee",
        ])
        .assert()
        .failure()
        .stderr(contains("last active admin"));
}

#[test]
fn test_task_add_accepts_hhmm_and_decimal() {
    let db_path = setup_test_db("cli_task_add");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "1:30", "standup and review");
    book(&db_path, "2", "2025-09-01", "2.25", "coding");

    rts()
        .args(["--db", &db_path, "task", "list", "--employee", "2"])
        .assert()
        .success()
        .stdout(contains("1:30"))
        .stdout(contains("2:15"))
        .stdout(contains("Apollo"))
        .stdout(contains("Development"));
}

#[test]
fn test_task_add_rejects_bad_hours() {
    let db_path = setup_test_db("cli_task_bad_hours");
    init_db_with_data(&db_path);

    for bad in ["1:75", "0", "25", "abc", "1:5"] {
        rts()
            .args([
                "--db",
                &db_path,
                "task",
                "add",
                "--employee",
                "2",
                "--date",
                "2025-09-01",
                "--project",
                "1",
                "--workstream",
                "1",
                "--hours",
                bad,
            ])
            .assert()
            .failure()
            .stderr(contains("Invalid hours"));
    }
}

#[test]
fn test_task_add_rejects_foreign_workstream() {
    let db_path = setup_test_db("cli_task_foreign_ws");
    init_db_with_data(&db_path);

    rts()
        .args([
            "--db", &db_path, "--as", "1", "project", "add", "--name", "Gemini",
        ])
        .assert()
        .success();
    rts()
        .args([
            "--db", &db_path, "--as", "1", "workstream", "add", "--project", "2", "--name",
            "Testing",
        ])
        .assert()
        .success();

    rts()
        .args([
            "--db",
            &db_path,
            "task",
            "add",
            "--employee",
            "2",
            "--date",
            "2025-09-01",
            "--project",
            "1",
            "--workstream",
            "2",
            "--hours",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("does not belong"));
}

#[test]
fn test_employee_cannot_book_for_someone_else() {
    let db_path = setup_test_db("cli_task_foreign_employee");
    init_db_with_data(&db_path);

    rts()
        .args([
            "--db",
            &db_path,
            "--as",
            "2",
            "task",
            "add",
            "--employee",
            "1",
            "--date",
            "2025-09-01",
            "--project",
            "1",
            "--workstream",
            "1",
            "--hours",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));
}

#[test]
fn test_week_view_totals() {
    let db_path = setup_test_db("cli_week_view");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "1:30", "monday");
    book(&db_path, "2", "2025-09-03", "2:15", "wednesday");
    // Next week: must not show up.
    book(&db_path, "2", "2025-09-08", "4", "next monday");

    rts()
        .args(["--db", &db_path, "week", "--employee", "2", "--date", "2025-09-04"])
        .assert()
        .success()
        .stdout(contains("2025-09-01 → 2025-09-07"))
        .stdout(contains("Sun"))
        .stdout(contains("1:30"))
        .stdout(contains("2:15"))
        .stdout(contains("3:45"))
        .stdout(contains("next monday").not())
        .stdout(contains("not submitted"));
}

#[test]
fn test_day_view() {
    let db_path = setup_test_db("cli_day_view");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "0:45", "planning");
    book(&db_path, "2", "2025-09-01", "0.5", "mail");

    rts()
        .args(["--db", &db_path, "day", "--employee", "2", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("planning"))
        .stdout(contains("Day total:"))
        .stdout(contains("1:15"));
}

#[test]
fn test_submit_locks_the_week() {
    let db_path = setup_test_db("cli_submit_locks");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "1:30", "monday");
    book(&db_path, "2", "2025-09-02", "2", "tuesday");

    rts()
        .args([
            "--db", &db_path, "submit", "--employee", "2", "--date", "2025-09-05", "--yes",
        ])
        .assert()
        .success()
        .stdout(contains("2 entries locked"));

    rts()
        .args(["--db", &db_path, "task", "edit", "1", "--hours", "1"])
        .assert()
        .failure()
        .stderr(contains("Locked"));

    rts()
        .args(["--db", &db_path, "task", "del", "2", "--yes"])
        .assert()
        .failure()
        .stderr(contains("Locked"));

    // A new entry inside the submitted week is refused too.
    rts()
        .args([
            "--db",
            &db_path,
            "task",
            "add",
            "--employee",
            "2",
            "--date",
            "2025-09-06",
            "--project",
            "1",
            "--workstream",
            "1",
            "--hours",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("already submitted"));

    rts()
        .args(["--db", &db_path, "week", "--employee", "2", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("submitted"))
        .stdout(contains("not submitted").not());
}

#[test]
fn test_submit_empty_week_warns() {
    let db_path = setup_test_db("cli_submit_empty");
    init_db_with_data(&db_path);

    rts()
        .args([
            "--db", &db_path, "submit", "--employee", "2", "--date", "2025-09-01", "--yes",
        ])
        .assert()
        .success()
        .stdout(contains("No open entries"));
}

#[test]
fn test_reopen_is_admin_only() {
    let db_path = setup_test_db("cli_reopen");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "3", "work");

    rts()
        .args([
            "--db", &db_path, "submit", "--employee", "2", "--date", "2025-09-01", "--yes",
        ])
        .assert()
        .success();

    rts()
        .args([
            "--db", &db_path, "--as", "2", "reopen", "--employee", "2", "--date", "2025-09-01",
        ])
        .assert()
        .failure()
        .stderr(contains("Forbidden"));

    rts()
        .args([
            "--db", &db_path, "--as", "1", "reopen", "--employee", "2", "--date", "2025-09-01",
        ])
        .assert()
        .success()
        .stdout(contains("reopened (1 entries)"));

    rts()
        .args(["--db", &db_path, "task", "edit", "1", "--hours", "2:30"])
        .assert()
        .success()
        .stdout(contains("2:30"));
}

#[test]
fn test_project_in_use_cannot_be_deleted() {
    let db_path = setup_test_db("cli_project_in_use");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "1", "work");

    rts()
        .args(["--db", &db_path, "--as", "1", "project", "del", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("still referenced"));

    rts()
        .args(["--db", &db_path, "task", "del", "1", "--yes"])
        .assert()
        .success();

    rts()
        .args(["--db", &db_path, "--as", "1", "project", "del", "1", "--yes"])
        .assert()
        .success();

    rts()
        .args(["--db", &db_path, "--as", "1", "workstream", "list"])
        .assert()
        .success()
        .stdout(contains("No workstreams found"));
}

#[test]
fn test_project_show_lists_workstreams() {
    let db_path = setup_test_db("cli_project_show");
    init_db_with_data(&db_path);

    rts()
        .args(["--db", &db_path, "--as", "2", "project", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Apollo"))
        .stdout(contains("NASA"))
        .stdout(contains("Development"));
}

#[test]
fn test_log_records_mutations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_data(&db_path);

    book(&db_path, "2", "2025-09-01", "1", "work");
    rts()
        .args([
            "--db", &db_path, "submit", "--employee", "2", "--date", "2025-09-01", "--yes",
        ])
        .assert()
        .success();

    rts()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("employee_add"))
        .stdout(contains("task_add"))
        .stdout(contains("submit"));
}

#[test]
fn test_backup_compressed() {
    let db_path = setup_test_db("cli_backup");
    init_db_with_data(&db_path);

    let dir = tempfile::tempdir().expect("tempdir");
    let dest = dir.path().join("backup.sqlite");
    let dest_str = dest.to_string_lossy().to_string();

    rts()
        .args(["--db", &db_path, "backup", "--file", &dest_str, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    assert!(dir.path().join("backup.zip").exists());
    assert!(!dest.exists());
}
