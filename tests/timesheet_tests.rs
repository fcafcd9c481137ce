use chrono::NaiveDate;
use rtimesheet::core::aggregate::{project_totals, summarize_day, summarize_week};
use rtimesheet::core::project::ProjectLogic;
use rtimesheet::core::store::TimeEntryStore;
use rtimesheet::core::submit::SubmissionGate;
use rtimesheet::core::tasks::{TaskLogic, TaskRules};
use rtimesheet::core::timesheet::Timesheet;
use rtimesheet::db::paging::{ListQuery, SortOrder};
use rtimesheet::errors::AppError;
use rtimesheet::models::project::NewProject;
use rtimesheet::models::task::{NewTask, TaskPatch, TaskRecord};
use rtimesheet::models::time_entry::TimeEntry;
use rtimesheet::utils::date::{day_window, parse_range, week_window};
use rtimesheet::utils::time::{format_hours, format_minutes, hours_to_minutes, parse_hours};

mod common;
use common::{Fixture, fixture};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

fn book(fx: &Fixture, employee_id: i64, date: &str, hours: f64) -> TaskRecord {
    TaskLogic::create(
        &fx.pool.conn,
        &fx.admin,
        &NewTask {
            employee_id,
            date: d(date),
            project_id: fx.project_id,
            workstream_id: fx.workstream_id,
            notes: format!("work on {date}"),
            hours,
        },
        TaskRules::default(),
    )
    .expect("book hours")
}

#[test]
fn test_hours_formatting() {
    assert_eq!(format_hours(1.5), "1:30");
    assert_eq!(format_hours(0.25), "0:15");
    assert_eq!(format_hours(10.0), "10:00");
    assert_eq!(format_hours(7.999), "8:00");
    assert_eq!(format_minutes(0), "0:00");
    assert_eq!(hours_to_minutes(1.0 / 3.0), 20);
}

#[test]
fn test_hours_parsing() {
    assert_eq!(parse_hours("1:30").expect("hh:mm"), 1.5);
    assert_eq!(parse_hours(" 2.75 ").expect("decimal"), 2.75);
    assert_eq!(parse_hours("24:00").expect("upper bound"), 24.0);

    for bad in [
        "", "0", "0:00", "0.001", "-1", "24:01", "1:60", "1:5", "x:30", "1.5h",
    ] {
        assert!(
            matches!(parse_hours(bad), Err(AppError::InvalidHours(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_week_window_is_monday_to_sunday() {
    // 2025-09-03 is a Wednesday.
    let w = week_window(d("2025-09-03"));
    assert_eq!(w.start, d("2025-09-01"));
    assert_eq!(w.end, d("2025-09-07"));
    assert_eq!(w.days().len(), 7);
    assert_eq!(w.start_at().to_string(), "2025-09-01 00:00:00");
    assert_eq!(w.end_at().to_string(), "2025-09-07 23:59:59");

    // Monday and Sunday map onto their own week.
    assert_eq!(week_window(d("2025-09-01")), w);
    assert_eq!(week_window(d("2025-09-07")), w);

    // Across a year boundary.
    let w = week_window(d("2026-01-01"));
    assert_eq!(w.start, d("2025-12-29"));
    assert_eq!(w.end, d("2026-01-04"));

    assert_eq!(w.previous().start, d("2025-12-22"));
    assert_eq!(w.next().end, d("2026-01-11"));
}

#[test]
fn test_parse_range_variants() {
    let y = parse_range("2024").expect("year");
    assert_eq!((y.start, y.end), (d("2024-01-01"), d("2024-12-31")));

    let m = parse_range("2024-02").expect("month");
    assert_eq!((m.start, m.end), (d("2024-02-01"), d("2024-02-29")));

    let r = parse_range("2025-08:2025-09").expect("month range");
    assert_eq!((r.start, r.end), (d("2025-08-01"), d("2025-09-30")));

    assert!(parse_range("2025-09:2025").is_err());
    assert!(parse_range("2025-10-01:2025-09-01").is_err());
    assert!(parse_range("2025-13").is_err());
}

#[test]
fn test_week_summary_zero_fills_and_sums_minutes() {
    let fx = fixture();
    let bob = fx.employee.employee_id;

    book(&fx, bob, "2025-09-01", 1.5);
    book(&fx, bob, "2025-09-01", 0.25);
    book(&fx, bob, "2025-09-04", 1.0 / 3.0);
    book(&fx, bob, "2025-09-08", 8.0);

    let s = Timesheet::week(&fx.pool.conn, &fx.employee, bob, d("2025-09-02")).expect("week");

    assert_eq!(s.days.len(), 7);
    assert_eq!(s.days[0].minutes, 105);
    assert_eq!(s.days[0].hhmm, "1:45");
    assert_eq!(s.days[1].minutes, 0);
    assert_eq!(s.days[1].hhmm, "0:00");
    assert_eq!(s.days[3].minutes, 20);
    assert_eq!(s.days[6].weekday, "Sun");

    assert_eq!(s.total_minutes, 125);
    assert_eq!(s.total_hhmm, "2:05");
    assert_eq!(
        s.total_minutes,
        s.days.iter().map(|day| day.minutes).sum::<i64>()
    );
    assert!(!s.submitted);

    assert_eq!(s.projects.len(), 1);
    assert_eq!(s.projects[0].minutes, 125);
}

#[test]
fn test_empty_week_is_not_submitted() {
    let fx = fixture();
    let s = Timesheet::week(&fx.pool.conn, &fx.admin, fx.employee.employee_id, d("2025-09-01"))
        .expect("week");
    assert_eq!(s.total_minutes, 0);
    assert!(!s.submitted);
    assert!(s.projects.is_empty());
}

#[test]
fn test_store_normalizes_and_orders_entries() {
    let fx = fixture();
    let bob = fx.employee.employee_id;

    let late = book(&fx, bob, "2025-09-05", 1.0);
    let early = book(&fx, bob, "2025-09-02", 2.0);
    book(&fx, fx.admin.employee_id, "2025-09-02", 3.0);

    let store = TimeEntryStore::load(&fx.pool.conn, bob, week_window(d("2025-09-02")))
        .expect("load store");

    let ids: Vec<i64> = store.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![early.id, late.id]);
    assert_eq!(store.entries_on(d("2025-09-02")).count(), 1);
    assert_eq!(store.get(late.id).map(|e| e.hhmm()), Some("1:00".to_string()));

    let day = summarize_day(&store, d("2025-09-05"));
    assert_eq!(day.minutes, 60);

    let totals = project_totals(&store);
    assert_eq!(totals[0].hhmm, "3:00");
}

#[test]
fn test_store_guards_submitted_entries() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    let rec = book(&fx, bob, "2025-09-02", 2.0);
    let window = week_window(rec.date);

    let store = TimeEntryStore::load(conn, bob, window).expect("load store");
    assert!(store.ensure_editable(rec.id).is_ok());
    assert!(store.ensure_open().is_ok());
    assert!(matches!(
        store.ensure_editable(9999),
        Err(AppError::NotFound { .. })
    ));

    SubmissionGate::submit(conn, &fx.employee, bob, &window).expect("submit");

    let store = TimeEntryStore::load(conn, bob, window).expect("reload store");
    assert!(store.has_submitted());
    assert!(matches!(
        store.ensure_editable(rec.id),
        Err(AppError::Locked(_))
    ));
    assert!(matches!(store.ensure_open(), Err(AppError::Locked(_))));
    assert!(summarize_week(&store).submitted);

    // The following week is still open.
    let next = TimeEntryStore::load(conn, bob, week_window(d("2025-09-08"))).expect("next week");
    assert!(next.ensure_open().is_ok());
}

#[test]
fn test_entry_moved_into_submitted_week_is_refused() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    book(&fx, bob, "2025-09-02", 1.0);
    let later = book(&fx, bob, "2025-09-09", 1.0);

    SubmissionGate::submit(conn, &fx.employee, bob, &week_window(d("2025-09-02")))
        .expect("submit first week");

    let moved = TaskLogic::update(
        conn,
        &fx.employee,
        later.id,
        &TaskPatch {
            date: Some(d("2025-09-03")),
            ..TaskPatch::default()
        },
        TaskRules::default(),
    );
    assert!(matches!(moved, Err(AppError::Locked(_))));

    let edited = TaskLogic::update(
        conn,
        &fx.employee,
        later.id,
        &TaskPatch {
            hours: Some(2.0),
            ..TaskPatch::default()
        },
        TaskRules::default(),
    )
    .expect("open week stays editable");
    assert_eq!(TimeEntry::from(&edited).minutes(), 120);
}

#[test]
fn test_failed_audit_rolls_back_the_mutation() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    let rec = book(&fx, bob, "2025-09-02", 1.0);

    conn.execute("DROP TABLE log", []).expect("drop audit table");

    let created = TaskLogic::create(
        conn,
        &fx.employee,
        &NewTask {
            employee_id: bob,
            date: d("2025-09-03"),
            project_id: fx.project_id,
            workstream_id: fx.workstream_id,
            notes: String::new(),
            hours: 1.0,
        },
        TaskRules::default(),
    );
    assert!(created.is_err());

    assert!(TaskLogic::delete(conn, &fx.employee, rec.id).is_err());

    let project = ProjectLogic::create(
        conn,
        Some(&fx.admin),
        &NewProject {
            name: "Gemini".into(),
            client: String::new(),
            description: String::new(),
        },
    );
    assert!(project.is_err());

    let store = TimeEntryStore::load(conn, bob, week_window(rec.date)).expect("load store");
    let ids: Vec<i64> = store.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![rec.id]);

    let projects = ProjectLogic::list(conn, &ListQuery::default(), 20).expect("list projects");
    assert_eq!(projects.total, 1);
}

#[test]
fn test_submission_gate_counts_and_is_idempotent() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    let window = week_window(d("2025-09-03"));

    book(&fx, bob, "2025-09-01", 1.0);
    book(&fx, bob, "2025-09-07", 2.0);
    let outside = book(&fx, bob, "2025-09-08", 3.0);

    assert_eq!(
        SubmissionGate::submit(conn, &fx.employee, bob, &window).expect("submit"),
        2
    );
    assert_eq!(
        SubmissionGate::submit(conn, &fx.employee, bob, &window).expect("resubmit"),
        0
    );

    let s = Timesheet::week(conn, &fx.employee, bob, window.start).expect("week");
    assert!(s.submitted);

    // The following week stays open.
    let next = TaskLogic::update(
        conn,
        &fx.employee,
        outside.id,
        &TaskPatch {
            hours: Some(4.0),
            ..TaskPatch::default()
        },
        TaskRules::default(),
    )
    .expect("edit open entry");
    assert_eq!(next.hours, 4.0);
}

#[test]
fn test_submitted_entries_cannot_change() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;

    let rec = book(&fx, bob, "2025-09-02", 2.0);
    let open = book(&fx, bob, "2025-09-09", 1.0);
    SubmissionGate::submit(conn, &fx.employee, bob, &week_window(rec.date)).expect("submit");

    let patch = TaskPatch {
        notes: Some("changed".into()),
        ..TaskPatch::default()
    };
    assert!(matches!(
        TaskLogic::update(conn, &fx.employee, rec.id, &patch, TaskRules::default()),
        Err(AppError::Locked(_))
    ));
    assert!(matches!(
        TaskLogic::delete(conn, &fx.admin, rec.id),
        Err(AppError::Locked(_))
    ));

    // Moving an open entry into the submitted week is refused as well.
    let move_in = TaskPatch {
        date: Some(d("2025-09-03")),
        ..TaskPatch::default()
    };
    assert!(matches!(
        TaskLogic::update(conn, &fx.employee, open.id, &move_in, TaskRules::default()),
        Err(AppError::Locked(_))
    ));
}

#[test]
fn test_reopen_requires_admin() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    let rec = book(&fx, bob, "2025-09-02", 2.0);
    let window = week_window(rec.date);

    SubmissionGate::submit(conn, &fx.employee, bob, &window).expect("submit");

    assert!(matches!(
        SubmissionGate::reopen(conn, &fx.employee, bob, &window),
        Err(AppError::Forbidden(_))
    ));
    assert_eq!(
        SubmissionGate::reopen(conn, &fx.admin, bob, &window).expect("reopen"),
        1
    );
    TaskLogic::delete(conn, &fx.employee, rec.id).expect("delete after reopen");
}

#[test]
fn test_employee_cannot_submit_for_others() {
    let fx = fixture();
    let window = day_window(d("2025-09-02"));
    assert!(matches!(
        SubmissionGate::submit(&fx.pool.conn, &fx.employee, fx.admin.employee_id, &window),
        Err(AppError::Forbidden(_))
    ));
}

#[test]
fn test_daily_limit() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;
    let rules = TaskRules {
        max_hours_per_day: 10.0,
    };

    let new = |hours: f64| NewTask {
        employee_id: bob,
        date: d("2025-09-02"),
        project_id: fx.project_id,
        workstream_id: fx.workstream_id,
        notes: String::new(),
        hours,
    };

    TaskLogic::create(conn, &fx.employee, &new(6.0), rules).expect("first block");
    assert!(matches!(
        TaskLogic::create(conn, &fx.employee, &new(4.5), rules),
        Err(AppError::Validation(_))
    ));
    TaskLogic::create(conn, &fx.employee, &new(4.0), rules).expect("exactly at the limit");
}

#[test]
fn test_daily_limit_counts_whole_minutes() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;

    let new = |hhmm: &str| NewTask {
        employee_id: bob,
        date: d("2025-09-02"),
        project_id: fx.project_id,
        workstream_id: fx.workstream_id,
        notes: String::new(),
        hours: parse_hours(hhmm).expect("hours"),
    };

    for hhmm in ["0:02", "16:02", "7:56"] {
        TaskLogic::create(conn, &fx.employee, &new(hhmm), TaskRules::default())
            .unwrap_or_else(|e| panic!("{hhmm} should fit: {e}"));
    }

    let day = Timesheet::day(conn, &fx.employee, bob, d("2025-09-02")).expect("day");
    assert_eq!(day.hhmm, "24:00");

    assert!(matches!(
        TaskLogic::create(conn, &fx.employee, &new("0:01"), TaskRules::default()),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_notes_length_limit() {
    let fx = fixture();
    let new = NewTask {
        employee_id: fx.employee.employee_id,
        date: d("2025-09-02"),
        project_id: fx.project_id,
        workstream_id: fx.workstream_id,
        notes: "x".repeat(501),
        hours: 1.0,
    };
    assert!(matches!(
        TaskLogic::create(&fx.pool.conn, &fx.employee, &new, TaskRules::default()),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_task_listing_is_scoped_and_paged() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;

    for day in 1..=5 {
        book(&fx, bob, &format!("2025-09-0{day}"), 1.0);
    }
    book(&fx, fx.admin.employee_id, "2025-09-01", 1.0);

    let query = ListQuery {
        page: Some(2),
        per_page: Some(2),
        sort: Some("date".into()),
        order: SortOrder::Desc,
        ..ListQuery::default()
    };

    // An employee asking for everyone only sees their own entries.
    let page = TaskLogic::list(conn, &fx.employee, None, None, &query, 20).expect("list");
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    let dates: Vec<String> = page.items.iter().map(|t| t.date_str()).collect();
    assert_eq!(dates, vec!["2025-09-03", "2025-09-02"]);

    let all = TaskLogic::list(conn, &fx.admin, None, None, &ListQuery::default(), 20)
        .expect("admin list");
    assert_eq!(all.total, 6);

    let window = parse_range("2025-09-04:2025-09-30").expect("range");
    let ranged = TaskLogic::list(
        conn,
        &fx.admin,
        Some(bob),
        Some(&window),
        &ListQuery::default(),
        20,
    )
    .expect("ranged list");
    assert_eq!(ranged.total, 2);

    assert!(matches!(
        TaskLogic::list(conn, &fx.employee, Some(fx.admin.employee_id), None, &query, 20),
        Err(AppError::Forbidden(_))
    ));

    let bad_page = ListQuery {
        page: Some(0),
        ..ListQuery::default()
    };
    assert!(matches!(
        TaskLogic::list(conn, &fx.admin, None, None, &bad_page, 20),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_search_escapes_like_wildcards() {
    let fx = fixture();
    let conn = &fx.pool.conn;
    let bob = fx.employee.employee_id;

    let mut with_percent = book(&fx, bob, "2025-09-01", 1.0);
    with_percent = TaskLogic::update(
        conn,
        &fx.employee,
        with_percent.id,
        &TaskPatch {
            notes: Some("100% done".into()),
            ..TaskPatch::default()
        },
        TaskRules::default(),
    )
    .expect("set notes");
    book(&fx, bob, "2025-09-02", 1.0);

    let query = ListQuery {
        search: Some("%".into()),
        ..ListQuery::default()
    };
    let page = TaskLogic::list(conn, &fx.admin, None, None, &query, 20).expect("search");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, with_percent.id);
}
