//! End-to-end command flows against a scripted local HTTP responder.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::Command;
use std::sync::mpsc;
use std::thread;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

use mymind_core::{session, RoutineItem, Role, Session, UserId};
use mymind_sync::{snapshot, working_file};

/// Method, path, `X-User-Id` and body of one request.
#[derive(Debug)]
struct Captured {
    method: String,
    path: String,
    user_id: Option<String>,
    body: String,
}

fn read_request(stream: &TcpStream) -> Captured {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let (mut user_id, mut content_length) = (None, 0);
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header line");
        let Some((k, v)) = line.trim_end().split_once(':') else { break };
        match k.to_ascii_lowercase().as_str() {
            "content-length" => content_length = v.trim().parse().expect("content length"),
            "x-user-id" => user_id = Some(v.trim().to_string()),
            _ => {}
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).expect("body");

    Captured {
        method,
        path,
        user_id,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

/// Serve `replies` in order, one connection each, then stop.
fn serve(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in replies {
            let Ok((mut stream, _)) = listener.accept() else { return };
            let _ = tx.send(read_request(&stream));
            write!(
                stream,
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("reply");
        }
    });

    (format!("http://{addr}"), rx)
}

fn mymind_cmd(home: &Path, base_url: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mymind"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("MYMIND_BASE_URL", base_url)
        .env_remove("RUST_LOG");
    cmd
}

fn log_in(home: &Path, role: Role, id: &str) {
    let mut s = session::load_at(home).expect("load session");
    s.set(role, UserId::from(id));
    session::save_at(home, &s).expect("save session");
}

#[test]
fn parent_login_then_logout_updates_session() {
    let home = TempDir::new().expect("home");
    let (url, rx) = serve(vec![
        (200, r#"{"message":"로그인 성공"}"#),
        (500, r#"{"error":"session store down"}"#),
    ]);

    mymind_cmd(home.path(), &url)
        .args(["parent", "login", "mom01", "--password", "pw"])
        .assert()
        .success()
        .stdout(contains("Logged in as parent 'mom01'"));
    let login = rx.recv().expect("login request");
    assert_eq!((login.method.as_str(), login.path.as_str()), ("POST", "/user/login"));
    assert!(login.body.contains(r#""account":"mom01""#));
    assert_eq!(
        session::load_at(home.path()).expect("session").user_id(Role::Parent),
        Some(&UserId::from("mom01"))
    );

    // Server-side failure still forgets the account locally.
    mymind_cmd(home.path(), &url)
        .args(["parent", "logout"])
        .assert()
        .success()
        .stdout(contains("locally"));
    let logout = rx.recv().expect("logout request");
    assert_eq!(logout.user_id.as_deref(), Some("mom01"));
    assert_eq!(session::load_at(home.path()).expect("session"), Session::default());
}

#[test]
fn rejected_login_keeps_session_empty() {
    let home = TempDir::new().expect("home");
    let (url, _rx) = serve(vec![(401, r#"{"message":"비밀번호가 틀렸습니다"}"#)]);

    mymind_cmd(home.path(), &url)
        .args(["parent", "login", "mom01", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(contains("비밀번호가 틀렸습니다"));
    assert_eq!(session::load_at(home.path()).expect("session"), Session::default());
}

#[test]
fn routines_list_marks_completed_items() {
    let home = TempDir::new().expect("home");
    log_in(home.path(), Role::Parent, "mom01");
    let (url, rx) = serve(vec![
        (
            200,
            r#"[{"id":1,"title":"양치하기","ownerAccount":"31"},{"id":2,"title":"숙제","ownerAccount":"31"}]"#,
        ),
        (200, r#"[{"routineId":2,"userId":31,"isCompleted":true}]"#),
    ]);

    let assert = mymind_cmd(home.path(), &url)
        .args(["routines", "list", "31", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse json");

    assert_eq!(payload[0]["title"], "양치하기");
    assert_eq!(payload[0]["isCompleted"], false);
    assert_eq!(payload[1]["isCompleted"], true);
    assert_eq!(rx.recv().expect("list").path, "/api/routines/user/31");
    assert_eq!(rx.recv().expect("logs").path, "/api/routine-logs/user/31");
}

#[test]
fn edit_then_save_pushes_only_the_difference() {
    let home = TempDir::new().expect("home");
    log_in(home.path(), Role::Parent, "mom01");
    let initial = r#"[{"id":1,"title":"A","ownerAccount":"31"},{"id":2,"title":"B","ownerAccount":"31"}]"#;
    let (url, rx) = serve(vec![
        // edit
        (200, initial),
        // save: staleness check, create, delete, refresh
        (200, initial),
        (200, r#"{"id":3,"title":"C","ownerAccount":"31"}"#),
        (200, ""),
        (
            200,
            r#"[{"id":1,"title":"A","ownerAccount":"31"},{"id":3,"title":"C","ownerAccount":"31"}]"#,
        ),
    ]);

    mymind_cmd(home.path(), &url)
        .args(["routines", "edit", "31"])
        .assert()
        .success()
        .stdout(contains("Editing 2 routine(s) for 31"));
    rx.recv().expect("edit list");

    let owner = UserId::from("31");
    let path = snapshot::working_path_at(home.path(), &owner).expect("working path");
    let mut items = working_file::read(&path).expect("read working file");
    items.retain(|i| i.title != "B");
    items.push(RoutineItem::new("C", UserId::default()));
    working_file::write(&path, &items).expect("write working file");

    mymind_cmd(home.path(), &url)
        .args(["routines", "save", "31"])
        .assert()
        .success()
        .stdout(contains("+ created #3 'C'"))
        .stdout(contains("- deleted #2"));

    let requests: Vec<Captured> = (0..4).map(|_| rx.recv().expect("request")).collect();
    let calls: Vec<(&str, &str)> = requests
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("GET", "/api/routines/user/31"),
            ("POST", "/api/routines"),
            ("DELETE", "/api/routines/2"),
            ("GET", "/api/routines/user/31"),
        ]
    );
    assert!(requests[1].body.contains(r#""ownerAccount":"31""#));
    assert!(requests.iter().all(|r| r.user_id.as_deref() == Some("mom01")));

    assert!(snapshot::load_at(home.path(), &owner).expect("snapshot").is_none());
    let saved = working_file::read(&path).expect("reread");
    assert_eq!(
        saved.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(),
        vec!["A", "C"]
    );
}

#[test]
fn save_dry_run_prints_plan_without_writing() {
    let home = TempDir::new().expect("home");
    log_in(home.path(), Role::Parent, "mom01");
    let initial = r#"[{"id":1,"title":"A","ownerAccount":"31"}]"#;
    let (url, rx) = serve(vec![(200, initial), (200, initial)]);

    mymind_cmd(home.path(), &url)
        .args(["routines", "edit", "31"])
        .assert()
        .success();

    let path = snapshot::working_path_at(home.path(), &UserId::from("31")).expect("working path");
    let mut items = working_file::read(&path).expect("read");
    items[0].title = "A2".into();
    working_file::write(&path, &items).expect("write");

    mymind_cmd(home.path(), &url)
        .args(["routines", "save", "31", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry-run]"))
        .stdout(contains("~ update #1 'A2'"));

    let methods: Vec<String> = (0..2).map(|_| rx.recv().expect("req").method).collect();
    assert_eq!(methods, vec!["GET", "GET"]);
    assert!(snapshot::load_at(home.path(), &UserId::from("31"))
        .expect("snapshot")
        .is_some());
}

#[test]
fn mood_record_posts_numeric_child_id() {
    let home = TempDir::new().expect("home");
    log_in(home.path(), Role::Child, "31");
    let (url, rx) = serve(vec![(200, "")]);

    mymind_cmd(home.path(), &url)
        .args(["mood", "record", "sad", "--reason", "친구랑 싸웠어요"])
        .assert()
        .success()
        .stdout(contains("슬퍼요"));

    let req = rx.recv().expect("mood request");
    assert_eq!(req.path, "/api/moods");
    assert_eq!(req.user_id.as_deref(), Some("31"));
    let body: serde_json::Value = serde_json::from_str(&req.body).expect("json body");
    assert_eq!(body["userId"], 31);
    assert_eq!(body["moodTypeName"], "SAD");
    assert_eq!(body["reason"], "친구랑 싸웠어요");
}
