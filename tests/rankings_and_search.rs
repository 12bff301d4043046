use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_examrecd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn examrecd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    payload: serde_json::Value,
) -> serde_json::Value {
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id"), payload.get("id"));
    value
}

fn result_ok(resp: serde_json::Value) -> serde_json::Value {
    assert!(
        resp.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "request failed: {}",
        resp
    );
    resp.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn rolls(result: &serde_json::Value) -> Vec<i64> {
    result
        .pointer("/model/students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|s| s.get("rollNumber").and_then(|v| v.as_i64()))
        .collect()
}

fn seeded(prefix: &str) -> (Child, ChildStdin, BufReader<ChildStdout>, PathBuf) {
    let workspace = temp_dir(prefix);
    let (child, mut stdin, mut reader) = spawn_sidecar();
    let _ = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "ws", "method": "workspace.select", "params": { "path": workspace.to_string_lossy() } }),
    ));

    // roll, c, python, java
    let rows = [
        (1, 55, 70, 90),
        (2, 91, 40, 60),
        (3, 12, 99, 75),
        (4, 78, 65, 88),
        (5, 91, 50, 20),
    ];
    for (roll, c, py, java) in rows {
        let _ = result_ok(request(
            &mut stdin,
            &mut reader,
            json!({
                "id": format!("seed{roll}"),
                "verb": "POST",
                "path": "/students",
                "params": {
                    "rollno": roll.to_string(),
                    "name": format!("Student <{roll}>"),
                    "c-marks": c.to_string(),
                    "python-marks": py.to_string(),
                    "java-marks": java.to_string()
                }
            }),
        ));
    }
    (child, stdin, reader, workspace)
}

#[test]
fn top_students_per_subject_take_the_best_three() {
    let (mut child, mut stdin, mut reader, workspace) = seeded("examrec-top-subject");

    let top_c = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "c", "method": "rankings.topC" }),
    ));
    assert_eq!(top_c["view"], json!("top-c-students"));
    // 91 ties between rolls 2 and 5 resolve by insertion order.
    assert_eq!(rolls(&top_c), vec![2, 5, 4]);

    let top_py = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "py", "verb": "GET", "path": "/top-students?subject=python-marks" }),
    ));
    assert_eq!(top_py["view"], json!("top-students-results"));
    assert_eq!(top_py.pointer("/model/subject"), Some(&json!("python")));
    assert_eq!(rolls(&top_py), vec![3, 1, 4]);

    let top_java_two = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "j", "method": "rankings.topSubject", "params": { "subject": "javaMarks", "n": 2 } }),
    ));
    assert_eq!(rolls(&top_java_two), vec![1, 4]);

    let html = top_py["html"].as_str().expect("html");
    assert!(html.contains("Student &lt;3&gt;"), "names are escaped");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&workspace);
}

#[test]
fn unknown_subject_is_a_validation_error() {
    let (mut child, mut stdin, mut reader, workspace) = seeded("examrec-bad-subject");

    for (i, subject) in ["total-marks", "rust", ""].iter().enumerate() {
        let resp = request(
            &mut stdin,
            &mut reader,
            json!({ "id": format!("bad{i}"), "method": "rankings.topSubject", "params": { "subject": subject } }),
        );
        assert_eq!(resp["ok"], json!(false));
        assert_eq!(resp["error"]["code"], json!("bad_params"));
        assert_eq!(resp["error"]["message"], json!("Invalid subject selected."));
    }

    let zero = request(
        &mut stdin,
        &mut reader,
        json!({ "id": "n0", "method": "rankings.topSubject", "params": { "subject": "c", "n": 0 } }),
    );
    assert_eq!(zero["error"]["code"], json!("bad_params"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&workspace);
}

#[test]
fn search_by_roll_number_reports_found_and_not_found() {
    let (mut child, mut stdin, mut reader, workspace) = seeded("examrec-search");

    let hit = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "hit", "verb": "GET", "path": "/search?rollno=4" }),
    ));
    assert_eq!(hit["found"], json!(true));
    assert_eq!(hit.pointer("/model/rollno"), Some(&json!(4)));
    assert_eq!(
        hit.pointer("/model/student/name").and_then(|v| v.as_str()),
        Some("Student <4>")
    );

    let miss = result_ok(request(
        &mut stdin,
        &mut reader,
        json!({ "id": "miss", "method": "students.findByRoll", "params": { "rollno": 404 } }),
    ));
    assert_eq!(miss["found"], json!(false));
    assert_eq!(miss.pointer("/model/student"), Some(&json!(null)));
    let html = miss["html"].as_str().expect("html");
    assert!(html.contains("No student found with roll number 404."));

    let bad = request(
        &mut stdin,
        &mut reader,
        json!({ "id": "bad", "method": "students.findByRoll", "params": { "rollno": "four" } }),
    );
    assert_eq!(bad["error"]["code"], json!("bad_params"));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(&workspace);
}
