use rtimesheet::config::Config;
use rtimesheet::server::{AppState, build_router, init_tracing};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

mod common;
use common::fixture;

/// Start the router on an ephemeral port backed by a freshly seeded DB.
async fn spawn_server() -> (SocketAddr, tempfile::TempDir) {
    let fx = fixture();
    let cfg = Config {
        database: fx.db_path.clone(),
        ..Config::default()
    };
    let app = build_router(AppState::new(fx.pool, cfg));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, fx._dir)
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    caller: Option<i64>,
    body: Option<Value>,
) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");

    let payload = body.map(|b| b.to_string()).unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(id) = caller {
        req.push_str(&format!("X-Employee-Id: {id}\r\n"));
    }
    if !payload.is_empty() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{payload}", payload.len()));

    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, body.to_string())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn task_body(employee_id: i64, date: &str, hours: Value) -> Value {
    json!({
        "employee_id": employee_id,
        "date": date,
        "project_id": 1,
        "workstream_id": 1,
        "notes": "api",
        "hours": hours,
    })
}

#[tokio::test]
async fn health_needs_no_identity() {
    let (addr, _dir) = spawn_server().await;
    let (status, body) = send_raw(addr, "GET", "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["status"], "ok");
}

#[tokio::test]
async fn missing_or_unknown_caller_is_unauthorized() {
    let (addr, _dir) = spawn_server().await;

    let (status, body) = send_raw(addr, "GET", "/tasks", None, None).await;
    assert_eq!(status, 401);
    assert!(parse(&body)["error"].as_str().is_some());

    let (status, _) = send_raw(addr, "GET", "/tasks", Some(42), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn employee_list_is_paged_and_scoped() {
    let (addr, _dir) = spawn_server().await;

    let (status, body) =
        send_raw(addr, "GET", "/employees?per_page=1&sort=id&order=desc", Some(1), None).await;
    assert_eq!(status, 200);
    let page = parse(&body);
    assert_eq!(page["total"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"][0]["email"], "bob@example.com");

    let (status, body) = send_raw(addr, "GET", "/employees", Some(2), None).await;
    assert_eq!(status, 200);
    let page = parse(&body);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], 2);

    let (status, _) = send_raw(addr, "GET", "/employees?sort=salary", Some(1), None).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn management_requires_admin() {
    let (addr, _dir) = spawn_server().await;
    let body = json!({ "name": "Gemini", "client": "NASA" });

    let (status, _) = send_raw(addr, "POST", "/projects", Some(2), Some(body.clone())).await;
    assert_eq!(status, 403);

    let (status, created) = send_raw(addr, "POST", "/projects", Some(1), Some(body.clone())).await;
    assert_eq!(status, 201);
    assert_eq!(parse(&created)["name"], "Gemini");

    let (status, _) = send_raw(addr, "POST", "/projects", Some(1), Some(body)).await;
    assert_eq!(status, 409);

    let (status, _) = send_raw(addr, "GET", "/projects/99", Some(2), None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn task_lifecycle_and_week_summary() {
    let (addr, _dir) = spawn_server().await;

    let (status, body) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-01", json!("1:30"))),
    )
    .await;
    assert_eq!(status, 201);
    let first = parse(&body);
    assert_eq!(first["hours"], 1.5);
    assert_eq!(first["final_submit"], false);

    let (status, _) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-03", json!(2.25))),
    )
    .await;
    assert_eq!(status, 201);

    let (status, _) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-03", json!("1:75"))),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = send_raw(
        addr,
        "GET",
        "/timesheet/week?employee_id=2&date=2025-09-04",
        Some(2),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let week = parse(&body);
    assert_eq!(week["window"]["start"], "2025-09-01");
    assert_eq!(week["window"]["end"], "2025-09-07");
    assert_eq!(week["days"].as_array().map(Vec::len), Some(7));
    assert_eq!(week["days"][0]["hhmm"], "1:30");
    assert_eq!(week["days"][1]["hhmm"], "0:00");
    assert_eq!(week["total_hhmm"], "3:45");
    assert_eq!(week["submitted"], false);

    let (status, body) = send_raw(
        addr,
        "GET",
        "/tasks?employee_id=2&from=2025-09-02&to=2025-09-30",
        Some(1),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["total"], 1);

    let (status, _) = send_raw(addr, "GET", "/tasks?from=2025-09-02", Some(1), None).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn submitted_week_is_locked() {
    let (addr, _dir) = spawn_server().await;

    let (_, body) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-02", json!(4))),
    )
    .await;
    let id = parse(&body)["id"].as_i64().expect("task id");

    let (status, _) = send_raw(
        addr,
        "POST",
        "/timesheet/submit",
        Some(1),
        Some(json!({ "employee_id": 1, "date": "2025-09-02" })),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send_raw(
        addr,
        "POST",
        "/timesheet/submit",
        Some(2),
        Some(json!({ "date": "2025-09-02" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["changed"], 1);

    let path = format!("/tasks/{id}");
    let (status, body) =
        send_raw(addr, "PUT", &path, Some(2), Some(json!({ "hours": 1 }))).await;
    assert_eq!(status, 423);
    assert!(parse(&body)["error"].as_str().expect("error").contains("submitted"));

    let (status, _) = send_raw(addr, "DELETE", &path, Some(2), None).await;
    assert_eq!(status, 423);

    let (status, _) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-05", json!(1))),
    )
    .await;
    assert_eq!(status, 423);

    let reopen = json!({ "employee_id": 2, "date": "2025-09-02" });
    let (status, _) =
        send_raw(addr, "POST", "/timesheet/reopen", Some(2), Some(reopen.clone())).await;
    assert_eq!(status, 403);

    let (status, _) = send_raw(addr, "POST", "/timesheet/reopen", Some(1), Some(reopen)).await;
    assert_eq!(status, 200);

    let (status, _) = send_raw(addr, "DELETE", &path, Some(2), None).await;
    assert_eq!(status, 204);
}

#[tokio::test]
async fn employees_cannot_read_other_timesheets() {
    let (addr, _dir) = spawn_server().await;

    let (status, _) =
        send_raw(addr, "GET", "/timesheet/day?employee_id=1&date=2025-09-01", Some(2), None)
            .await;
    assert_eq!(status, 403);

    let (status, body) =
        send_raw(addr, "GET", "/timesheet/day?employee_id=2&date=2025-09-01", Some(1), None)
            .await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["hhmm"], "0:00");
}

#[tokio::test]
async fn workstream_in_use_cannot_be_deleted() {
    let (addr, _dir) = spawn_server().await;

    send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "2025-09-02", json!(1))),
    )
    .await;

    let (status, _) = send_raw(addr, "DELETE", "/workstreams/1", Some(1), None).await;
    assert_eq!(status, 409);

    let (status, body) = send_raw(addr, "GET", "/workstreams?project_id=1", Some(2), None).await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["items"][0]["name"], "Development");
}

#[tokio::test]
async fn malformed_input_is_a_json_bad_request() {
    let (addr, _dir) = spawn_server().await;

    let (status, body) = send_raw(
        addr,
        "POST",
        "/tasks",
        Some(2),
        Some(task_body(2, "not-a-date", json!(1))),
    )
    .await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"].as_str().is_some());

    let (status, body) = send_raw(addr, "GET", "/tasks/abc", Some(1), None).await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"].as_str().is_some());

    let (status, body) = send_raw(
        addr,
        "GET",
        "/timesheet/week?date=2025-13-01",
        Some(2),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"].as_str().is_some());

    let (status, body) = send_raw(
        addr,
        "PUT",
        "/employees/2",
        Some(1),
        Some(json!({ "active": "sometimes" })),
    )
    .await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"].as_str().is_some());
}

#[tokio::test]
async fn tracing_can_be_initialised_twice() {
    init_tracing();
    init_tracing();

    let (addr, _dir) = spawn_server().await;
    let (status, _) = send_raw(addr, "GET", "/health", None, None).await;
    assert_eq!(status, 200);
}
