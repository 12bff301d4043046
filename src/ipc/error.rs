use crate::error::RecordError;
use crate::render::{self, View, ViewModel};
use serde_json::json;
use tracing::{error, warn};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        let message = message.into();
        HandlerErr {
            code: "bad_params",
            details: Some(error_page(&message)),
            message,
        }
    }

    /// Maps a service failure onto the wire. Store failures are logged with
    /// their cause and reported to the user only as `generic`.
    pub fn from_record(e: RecordError, code: &'static str, generic: &str) -> Self {
        match e {
            RecordError::Validation(message) => {
                warn!(%message, "request rejected");
                HandlerErr::bad_params(message)
            }
            RecordError::Store(cause) => {
                error!(code, error = %cause, "store operation failed");
                HandlerErr {
                    code,
                    message: generic.to_string(),
                    details: Some(error_page(generic)),
                }
            }
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

fn error_page(message: &str) -> serde_json::Value {
    let model = ViewModel::error(message);
    let html = render::render(View::Error, &model);
    json!({
        "view": View::Error.name(),
        "model": model,
        "html": html,
    })
}
