mod calc;
mod config;
mod db;
mod error;
mod ipc;
mod logging;
mod model;
mod query;
mod render;

use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();
    logging::init(&args.log_filter);

    let mut state = ipc::AppState {
        workspace: None,
        store: None,
    };
    if let Some(path) = args.workspace {
        let store = db::Store::open(&path)?;
        info!(workspace = %path.display(), "workspace opened");
        state.workspace = Some(path);
        state.store = Some(store);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            // Can't echo an id we failed to parse.
            Err(e) => {
                warn!(error = %e, "unparsable request line");
                ipc::err("", "bad_json", e.to_string(), None)
            }
            Ok(req) => ipc::handle_request(&mut state, req),
        };
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    Ok(())
}
