use crate::calc;
use crate::error::RecordError;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{page, param_f64, param_i64, param_str, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::NewStudent;
use crate::query;
use crate::render::{View, ViewModel};
use serde_json::json;
use tracing::info;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match query::list_all(store) {
        Ok(students) => page(
            &req.id,
            View::StudentList,
            ViewModel::students(students),
            json!({}),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_query_failed",
            "An error occurred while fetching students.",
        )
        .response(&req.id),
    }
}

fn parse_new_student(params: &serde_json::Value) -> Result<NewStudent, HandlerErr> {
    let Some(name) = param_str(params, &["name"]) else {
        return Err(HandlerErr::bad_params("name must not be empty"));
    };
    Ok(NewStudent {
        roll_number: param_i64(params, &["rollno", "rollNumber"])?,
        name,
        c_marks: param_f64(params, &["c-marks", "cMarks"])?,
        python_marks: param_f64(params, &["python-marks", "pythonMarks"])?,
        java_marks: param_f64(params, &["java-marks", "javaMarks"])?,
    })
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student = match parse_new_student(&req.params) {
        Ok(s) => s,
        Err(e) => return e.response(&req.id),
    };

    match store.create(&student) {
        Ok(student_id) => {
            info!(id = %student_id, roll = ?student.roll_number, "student created");
            page(
                &req.id,
                View::Success,
                ViewModel::message(format!(
                    "The student {} was added successfully.",
                    student.name
                )),
                json!({ "studentId": student_id }),
            )
        }
        Err(e) => HandlerErr::from_record(
            RecordError::from(e),
            "db_insert_failed",
            "An error occurred while saving the student.",
        )
        .response(&req.id),
    }
}

fn handle_students_find_by_roll(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let roll = match param_i64(&req.params, &["rollno", "rollNumber"]) {
        Ok(Some(r)) => r,
        Ok(None) => return HandlerErr::bad_params("missing rollno").response(&req.id),
        Err(e) => return e.response(&req.id),
    };

    match query::find_by_roll_number(store, roll) {
        Ok(student) => {
            let found = student.is_some();
            page(
                &req.id,
                View::SearchResults,
                ViewModel::Lookup {
                    student,
                    rollno: roll,
                },
                json!({ "found": found }),
            )
        }
        Err(e) => HandlerErr::from_record(
            e,
            "db_query_failed",
            "An error occurred while searching for the student.",
        )
        .response(&req.id),
    }
}

fn handle_students_delete_zero_marks(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match calc::delete_zero_score_records(store) {
        Ok(deleted) => page(
            &req.id,
            View::Success,
            ViewModel::message(
                "Documents with 0 marks in all subjects have been deleted successfully.",
            ),
            json!({ "deleted": deleted }),
        ),
        Err(e) => HandlerErr::from_record(
            e,
            "db_delete_failed",
            "An error occurred while deleting documents with 0 marks.",
        )
        .response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.findByRoll" => Some(handle_students_find_by_roll(state, req)),
        "students.deleteZeroMarks" => Some(handle_students_delete_zero_marks(state, req)),
        _ => None,
    }
}
