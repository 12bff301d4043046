use crate::ipc::helpers::page;
use crate::ipc::types::{AppState, Request};
use crate::render::{View, ViewModel};
use serde_json::json;

/// Static pages need no store.
pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let view = match req.method.as_str() {
        "pages.index" => View::Index,
        "pages.menu" => View::Menu,
        "pages.graceMarksForm" => View::GraceMarksForm,
        "pages.searchForm" => View::SearchForm,
        "pages.topStudentsForm" => View::TopStudentsForm,
        _ => return None,
    };
    Some(page(&req.id, view, ViewModel::Empty {}, json!({})))
}
