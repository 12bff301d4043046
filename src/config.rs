use clap::Parser;
use std::path::PathBuf;

/// Student exam records sidecar. Reads JSON requests from stdin, one per
/// line, and answers on stdout.
#[derive(Debug, Parser)]
#[command(name = "examrecd", version)]
pub struct Args {
    /// Workspace directory to open at startup. Without it, clients must send
    /// `workspace.select` first.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Log filter directives, e.g. `info` or `examrecd=debug`. `RUST_LOG`
    /// takes precedence when set.
    #[arg(long, value_name = "SPEC", default_value = "info")]
    pub log_filter: String,
}
