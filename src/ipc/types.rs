use std::path::PathBuf;

use crate::db::Store;
use serde::Deserialize;

/// One request line. `method` names the handler directly; otherwise
/// `verb` + `path` are resolved through the route table.
#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub verb: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<Store>,
}
