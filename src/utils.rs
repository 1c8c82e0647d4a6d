use std::fmt::Write as _;

use tracing_subscriber::EnvFilter;

use crate::state::StateMeta;

/// Install a stderr subscriber whose level follows a `-v` count.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    install(EnvFilter::new(level));
}

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing_from_env() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter);
}

fn install(filter: EnvFilter) {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Render a per-stage timing table for a finished run.
pub fn render_summary(meta: &StateMeta) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} | {:>12}", "Stage", "Time (ms)");
    let _ = writeln!(out, "{:-<24}-+-{:-<12}", "", "");
    for timing in &meta.stage_metadata {
        let _ = writeln!(
            out,
            "{:<24} | {:>12.3}",
            timing.stage,
            timing.duration.as_secs_f64() * 1000.0
        );
    }
    if !meta.errors.is_empty() {
        let _ = writeln!(out, "errors: {}", meta.errors.join("; "));
    }
    if !meta.warnings.is_empty() {
        let _ = writeln!(out, "warnings: {}", meta.warnings.join("; "));
    }
    out
}

pub fn print_summary(meta: &StateMeta) {
    println!("\n{}", render_summary(meta));
}
