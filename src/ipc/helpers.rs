use crate::db::Store;
use crate::ipc::error::{ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::render::{self, View, ViewModel};
use serde_json::json;

pub fn require_store<'a>(state: &'a AppState, req: &Request) -> Result<&'a Store, serde_json::Value> {
    state
        .store
        .as_ref()
        .ok_or_else(|| HandlerErr {
            code: "no_workspace",
            message: "select a workspace first".to_string(),
            details: None,
        }
        .response(&req.id))
}

/// Successful page response: view name, its model and the rendered HTML,
/// merged with any operation-specific `extra` fields.
pub fn page(id: &str, view: View, model: ViewModel, extra: serde_json::Value) -> serde_json::Value {
    let html = render::render(view, &model);
    let mut result = json!({
        "view": view.name(),
        "model": model,
        "html": html,
    });
    if let (Some(dst), Some(src)) = (result.as_object_mut(), extra.as_object()) {
        for (k, v) in src {
            dst.insert(k.clone(), v.clone());
        }
    }
    ok(id, result)
}

/// First present key wins, so form names (`c-marks`) and camelCase names
/// (`cMarks`) are both accepted.
fn lookup<'a, 'k>(
    params: &'a serde_json::Value,
    keys: &[&'k str],
) -> Option<(&'k str, &'a serde_json::Value)> {
    keys.iter().find_map(|k| {
        params
            .get(*k)
            .filter(|v| !v.is_null())
            .map(|v| (*k, v))
    })
}

pub fn param_str(params: &serde_json::Value, keys: &[&str]) -> Option<String> {
    let (_, v) = lookup(params, keys)?;
    let s = match v {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Numbers arrive as JSON numbers or as form strings; an empty string is absent.
pub fn param_f64(params: &serde_json::Value, keys: &[&str]) -> Result<Option<f64>, HandlerErr> {
    let Some((key, v)) = lookup(params, keys) else {
        return Ok(None);
    };
    match v {
        serde_json::Value::Number(n) => Ok(n.as_f64()),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be a number"))),
        _ => Err(HandlerErr::bad_params(format!("{key} must be a number"))),
    }
}

pub fn param_i64(params: &serde_json::Value, keys: &[&str]) -> Result<Option<i64>, HandlerErr> {
    let Some((key, v)) = lookup(params, keys) else {
        return Ok(None);
    };
    let bad = || HandlerErr::bad_params(format!("{key} must be a whole number"));
    match v {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                _ => Err(bad()),
            }
        }
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s.trim().parse::<i64>().map(Some).map_err(|_| bad()),
        _ => Err(bad()),
    }
}

/// Splits `/search?rollno=5` into the path and its decoded query pairs.
pub fn split_query(raw: &str) -> (&str, Vec<(String, String)>) {
    let Some((path, query)) = raw.split_once('?') else {
        return (raw, Vec::new());
    };
    let pairs = query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (k, v) = p.split_once('=').unwrap_or((p, ""));
            (decode_component(k), decode_component(v))
        })
        .collect();
    (path, pairs)
}

fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
