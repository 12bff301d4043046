use crate::calc;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{page, param_i64, param_str, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::Subject;
use crate::render::{View, ViewModel};
use serde_json::json;

fn handle_compute_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match calc::compute_total_marks(store) {
        Ok(updated) => page(
            &req.id,
            View::Success,
            ViewModel::message("The total marks for all students have been updated successfully."),
            json!({ "updated": updated }),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_update_failed",
            "An error occurred while computing total marks.",
        )
        .response(&req.id),
    }
}

fn handle_compute_percentage(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match calc::compute_percentage(store) {
        Ok(updated) => page(
            &req.id,
            View::Success,
            ViewModel::message("The percentage for all students has been updated successfully."),
            json!({ "updated": updated }),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_update_failed",
            "An error occurred while computing percentage.",
        )
        .response(&req.id),
    }
}

fn handle_apply_grace(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let amount = match param_i64(&req.params, &["graceMarks", "amount"]) {
        Ok(Some(v)) => v,
        Ok(None) => return HandlerErr::bad_params("missing graceMarks").response(&req.id),
        Err(e) => return e.response(&req.id),
    };
    // Grace marks historically target Java only.
    let subject = match param_str(&req.params, &["subject"]) {
        None => Subject::Java,
        Some(raw) => match Subject::require(Some(raw.as_str())) {
            Ok(s) => s,
            Err(e) => return HandlerErr::from_record(e, "bad_params", "").response(&req.id),
        },
    };

    match calc::apply_grace_marks(store, subject, amount) {
        Ok(updated) => page(
            &req.id,
            View::Success,
            ViewModel::message(format!(
                "Successfully applied {amount} grace marks to all students in {subject}."
            )),
            json!({ "updated": updated, "subject": subject }),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_update_failed",
            "An error occurred while applying grace marks.",
        )
        .response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.computeTotals" => Some(handle_compute_totals(state, req)),
        "marks.computePercentage" => Some(handle_compute_percentage(state, req)),
        "marks.applyGrace" => Some(handle_apply_grace(state, req)),
        _ => None,
    }
}
