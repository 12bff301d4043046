use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{page, param_i64, param_str, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::Subject;
use crate::query::{self, DEFAULT_TOP_N};
use crate::render::{View, ViewModel};
use serde_json::json;

fn top_for(
    state: &mut AppState,
    req: &Request,
    view: View,
    subject: Subject,
    n: usize,
) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match query::top_n(store, subject, n) {
        Ok(students) => page(
            &req.id,
            view,
            ViewModel::Students {
                students,
                subject: Some(subject),
            },
            json!({}),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_query_failed",
            &format!("An error occurred while fetching top {subject} students."),
        )
        .response(&req.id),
    }
}

fn handle_top_c(state: &mut AppState, req: &Request) -> serde_json::Value {
    top_for(state, req, View::TopCStudents, Subject::C, DEFAULT_TOP_N)
}

fn handle_top_subject(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Validated before the store is consulted.
    let raw = param_str(&req.params, &["subject"]);
    let subject = match Subject::require(raw.as_deref()) {
        Ok(s) => s,
        Err(e) => return HandlerErr::from_record(e, "bad_params", "").response(&req.id),
    };
    let n = match param_i64(&req.params, &["n", "limit"]) {
        Ok(None) => DEFAULT_TOP_N,
        Ok(Some(v)) if v > 0 => v as usize,
        Ok(Some(_)) => return HandlerErr::bad_params("n must be positive").response(&req.id),
        Err(e) => return e.response(&req.id),
    };
    top_for(state, req, View::TopStudentsResults, subject, n)
}

fn handle_merit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match query::merit_list(store) {
        Ok(students) => page(
            &req.id,
            View::MeritList,
            ViewModel::students(students),
            json!({}),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_query_failed",
            "An error occurred while fetching merit list.",
        )
        .response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "rankings.topC" => Some(handle_top_c(state, req)),
        "rankings.topSubject" => Some(handle_top_subject(state, req)),
        "rankings.merit" => Some(handle_merit(state, req)),
        _ => None,
    }
}
