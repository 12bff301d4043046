use super::handlers;
use super::helpers::split_query;
use super::types::{AppState, Request};
use crate::ipc::error::err;
use tracing::debug;

pub struct Route {
    pub verb: &'static str,
    pub path: &'static str,
    pub method: &'static str,
}

const fn route(verb: &'static str, path: &'static str, method: &'static str) -> Route {
    Route { verb, path, method }
}

/// HTTP-style routes of the form pages, mapped onto IPC methods.
pub const ROUTES: &[Route] = &[
    route("GET", "/", "pages.index"),
    route("GET", "/menu", "pages.menu"),
    route("GET", "/students", "students.list"),
    route("POST", "/students", "students.create"),
    route("GET", "/compute-total-marks", "marks.computeTotals"),
    route("GET", "/compute-percentage", "marks.computePercentage"),
    route("GET", "/delete-zero-marks", "students.deleteZeroMarks"),
    route("GET", "/top-c-students", "rankings.topC"),
    route("GET", "/merit-list", "rankings.merit"),
    route("GET", "/grace-marks-form", "pages.graceMarksForm"),
    route("POST", "/apply-grace-marks", "marks.applyGrace"),
    route("GET", "/search-form", "pages.searchForm"),
    route("GET", "/search", "students.findByRoll"),
    route("GET", "/top-students-form", "pages.topStudentsForm"),
    route("GET", "/top-students", "rankings.topSubject"),
];

pub fn resolve_route(verb: &str, path: &str) -> Option<&'static str> {
    ROUTES
        .iter()
        .find(|r| r.verb.eq_ignore_ascii_case(verb) && r.path == path)
        .map(|r| r.method)
}

/// Fills `method` from `verb` + `path` when the caller addressed a route.
/// Query-string pairs become params unless the params already name them.
fn resolve(mut req: Request) -> Result<Request, serde_json::Value> {
    if !req.method.is_empty() {
        return Ok(req);
    }
    let Some(raw_path) = req.path.clone() else {
        return Err(err(&req.id, "bad_params", "missing method or path", None));
    };
    let verb = req.verb.clone().unwrap_or_else(|| "GET".to_string());
    let (path, query) = split_query(&raw_path);

    let Some(method) = resolve_route(&verb, path) else {
        return Err(err(
            &req.id,
            "not_implemented",
            format!("no route for {} {}", verb.to_ascii_uppercase(), path),
            None,
        ));
    };
    debug!(%verb, path, method, "route resolved");

    if !req.params.is_object() {
        req.params = serde_json::Value::Object(Default::default());
    }
    if let Some(params) = req.params.as_object_mut() {
        for (k, v) in query {
            params.entry(k).or_insert(serde_json::Value::String(v));
        }
    }
    req.method = method.to_string();
    Ok(req)
}

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    let req = match resolve(req) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::pages::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::marks::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::rankings::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use serde_json::json;

    fn state_with_store() -> AppState {
        AppState {
            workspace: None,
            store: Some(Store::open_in_memory().expect("store")),
        }
    }

    fn call(state: &mut AppState, value: serde_json::Value) -> serde_json::Value {
        let req: Request = serde_json::from_value(value).expect("request");
        handle_request(state, req)
    }

    fn result(resp: &serde_json::Value) -> &serde_json::Value {
        assert_eq!(resp["ok"], json!(true), "unexpected failure: {resp}");
        &resp["result"]
    }

    #[test]
    fn every_route_resolves_to_a_handled_method() {
        let mut state = state_with_store();
        for (i, r) in ROUTES.iter().enumerate() {
            let resp = call(
                &mut state,
                json!({ "id": i.to_string(), "method": r.method, "params": {} }),
            );
            let code = resp["error"]["code"].as_str().unwrap_or("");
            assert_ne!(code, "not_implemented", "{} not handled", r.method);
        }
    }

    #[test]
    fn resolve_route_is_verb_sensitive() {
        assert_eq!(resolve_route("get", "/students"), Some("students.list"));
        assert_eq!(resolve_route("POST", "/students"), Some("students.create"));
        assert_eq!(resolve_route("POST", "/merit-list"), None);
        assert_eq!(resolve_route("GET", "/nope"), None);
    }

    #[test]
    fn example_scenario_through_routes() {
        let mut state = state_with_store();
        for (id, roll, c, py, java) in [("a", 1, "90", "80", "70"), ("b", 2, "60", "60", "60")] {
            let resp = call(
                &mut state,
                json!({
                    "id": id,
                    "verb": "POST",
                    "path": "/students",
                    "params": {
                        "rollno": roll.to_string(),
                        "name": format!("Student {roll}"),
                        "c-marks": c,
                        "python-marks": py,
                        "java-marks": java
                    }
                }),
            );
            assert_eq!(result(&resp)["view"], json!("success"));
        }

        let totals = call(&mut state, json!({ "id": "t", "path": "/compute-total-marks" }));
        assert_eq!(result(&totals)["updated"], json!(2));
        let pct = call(&mut state, json!({ "id": "p", "path": "/compute-percentage" }));
        assert_eq!(result(&pct)["updated"], json!(2));

        let merit = call(&mut state, json!({ "id": "m", "path": "/merit-list" }));
        let students = result(&merit)["model"]["students"]
            .as_array()
            .cloned()
            .expect("students");
        let rolls: Vec<i64> = students
            .iter()
            .filter_map(|s| s["rollNumber"].as_i64())
            .collect();
        assert_eq!(rolls, vec![1, 2]);
        assert_eq!(students[0]["totalMarks"].as_f64(), Some(240.0));
        assert_eq!(students[1]["totalMarks"].as_f64(), Some(180.0));
        let p0 = students[0]["percentage"].as_f64().expect("percentage");
        assert!((p0 - 80.0).abs() < 1e-9);
    }

    #[test]
    fn query_string_feeds_params() {
        let mut state = state_with_store();
        let _ = call(
            &mut state,
            json!({ "id": "1", "method": "students.create", "params": { "rollno": 9, "name": "Nine" } }),
        );
        let resp = call(&mut state, json!({ "id": "2", "path": "/search?rollno=9" }));
        let res = result(&resp);
        assert_eq!(res["view"], json!("search-results"));
        assert_eq!(res["found"], json!(true));
        assert_eq!(res["model"]["student"]["name"], json!("Nine"));
    }

    #[test]
    fn invalid_subject_is_rejected_before_the_store() {
        let mut state = AppState {
            workspace: None,
            store: None,
        };
        let resp = call(
            &mut state,
            json!({ "id": "1", "path": "/top-students?subject=total-marks" }),
        );
        assert_eq!(resp["ok"], json!(false));
        assert_eq!(resp["error"]["code"], json!("bad_params"));
        assert_eq!(resp["error"]["message"], json!("Invalid subject selected."));
    }

    #[test]
    fn unknown_route_and_method_are_not_implemented() {
        let mut state = state_with_store();
        let r1 = call(&mut state, json!({ "id": "1", "verb": "DELETE", "path": "/students" }));
        assert_eq!(r1["error"]["code"], json!("not_implemented"));
        let r2 = call(&mut state, json!({ "id": "2", "method": "students.explode" }));
        assert_eq!(r2["error"]["code"], json!("not_implemented"));
        let r3 = call(&mut state, json!({ "id": "3" }));
        assert_eq!(r3["error"]["code"], json!("bad_params"));
    }

    #[test]
    fn store_operations_need_a_workspace() {
        let mut state = AppState {
            workspace: None,
            store: None,
        };
        let resp = call(&mut state, json!({ "id": "1", "method": "students.list" }));
        assert_eq!(resp["error"]["code"], json!("no_workspace"));
        let page = call(&mut state, json!({ "id": "2", "method": "pages.menu" }));
        assert_eq!(page["ok"], json!(true));
    }

    #[test]
    fn store_failures_surface_generic_messages() {
        let mut state = state_with_store();
        state
            .store
            .as_ref()
            .expect("store")
            .connection()
            .execute("DROP TABLE students", [])
            .expect("drop");

        let cases = [
            (
                "marks.computeTotals",
                "db_update_failed",
                "An error occurred while computing total marks.",
            ),
            (
                "students.list",
                "db_query_failed",
                "An error occurred while fetching students.",
            ),
            (
                "students.deleteZeroMarks",
                "db_delete_failed",
                "An error occurred while deleting documents with 0 marks.",
            ),
            (
                "rankings.merit",
                "db_query_failed",
                "An error occurred while fetching merit list.",
            ),
        ];
        for (i, (method, code, message)) in cases.into_iter().enumerate() {
            let resp = call(
                &mut state,
                json!({ "id": i.to_string(), "method": method, "params": {} }),
            );
            assert_eq!(resp["ok"], json!(false), "{method} should fail");
            assert_eq!(resp["error"]["code"], json!(code), "{method}");
            assert_eq!(resp["error"]["message"], json!(message), "{method}");
            assert_eq!(resp["error"]["details"]["view"], json!("error"), "{method}");
            assert_eq!(resp["error"]["details"]["model"]["error"], json!(message));
            let html = resp["error"]["details"]["html"].as_str().unwrap_or("");
            assert!(!html.contains("no such table"), "{method} leaked the cause");
        }
    }
}
