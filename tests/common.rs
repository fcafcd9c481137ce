#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtimesheet::core::access::Viewer;
use rtimesheet::core::employee::EmployeeLogic;
use rtimesheet::core::project::ProjectLogic;
use rtimesheet::core::workstream::WorkstreamLogic;
use rtimesheet::db::pool::DbPool;
use rtimesheet::models::employee::NewEmployee;
use rtimesheet::models::project::NewProject;
use rtimesheet::models::role::Role;
use rtimesheet::models::workstream::NewWorkstream;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rts() -> Command {
    cargo_bin_cmd!("rtimesheet")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimesheet.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB through the CLI and register:
/// admin #1, employee #2, project #1 "Apollo", workstream #1 "Development".
pub fn init_db_with_data(db_path: &str) {
    rts()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    // No admin yet: the first one needs no identity.
    rts()
        .args([
            "--db", db_path, "employee", "add", "--name", "Ada Admin", "--email",
            "ada@example.com", "--role", "admin",
        ])
        .assert()
        .success();

    rts()
        .args([
            "--db", db_path, "--as", "1", "employee", "add", "--name", "Bob Builder",
            "--email", "bob@example.com", "--designation", "Developer",
        ])
        .assert()
        .success();

    rts()
        .args([
            "--db", db_path, "--as", "1", "project", "add", "--name", "Apollo", "--client",
            "NASA",
        ])
        .assert()
        .success();

    rts()
        .args([
            "--db", db_path, "--as", "1", "workstream", "add", "--project", "1", "--name",
            "Development",
        ])
        .assert()
        .success();
}

/// Book hours for an employee through the CLI.
pub fn book(db_path: &str, employee: &str, date: &str, hours: &str, notes: &str) {
    rts()
        .args([
            "--db",
            db_path,
            "task",
            "add",
            "--employee",
            employee,
            "--date",
            date,
            "--project",
            "1",
            "--workstream",
            "1",
            "--hours",
            hours,
            "--notes",
            notes,
        ])
        .assert()
        .success();
}

/// Library-level fixture: a migrated DB in a temp dir with the same
/// dataset as [`init_db_with_data`].
pub struct Fixture {
    pub pool: DbPool,
    pub db_path: String,
    pub admin: Viewer,
    pub employee: Viewer,
    pub project_id: i64,
    pub workstream_id: i64,
    pub _dir: tempfile::TempDir,
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir
        .path()
        .join("rtimesheet.sqlite")
        .to_string_lossy()
        .to_string();
    let pool = DbPool::open(&db_path).expect("open db");
    let conn = &pool.conn;

    let admin = EmployeeLogic::create(
        conn,
        None,
        &NewEmployee {
            name: "Ada Admin".into(),
            email: "ada@example.com".into(),
            designation: "Lead".into(),
            role: Role::Admin,
        },
    )
    .expect("create admin");
    let admin = Viewer::resolve(conn, admin.id).expect("admin viewer");

    let bob = EmployeeLogic::create(
        conn,
        Some(&admin),
        &NewEmployee {
            name: "Bob Builder".into(),
            email: "bob@example.com".into(),
            designation: "Developer".into(),
            role: Role::Employee,
        },
    )
    .expect("create employee");
    let employee = Viewer::resolve(conn, bob.id).expect("employee viewer");

    let project = ProjectLogic::create(
        conn,
        Some(&admin),
        &NewProject {
            name: "Apollo".into(),
            client: "NASA".into(),
            description: String::new(),
        },
    )
    .expect("create project");

    let ws = WorkstreamLogic::create(
        conn,
        Some(&admin),
        &NewWorkstream {
            project_id: project.id,
            name: "Development".into(),
            description: String::new(),
        },
    )
    .expect("create workstream");

    Fixture {
        pool,
        db_path,
        admin,
        employee,
        project_id: project.id,
        workstream_id: ws.id,
        _dir: dir,
    }
}
