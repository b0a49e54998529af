use std::io;

use tracing_subscriber::{fmt, EnvFilter};

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "cutout=info,warn",
        1 => "cutout=debug,info",
        2 => "debug",
        _ => "trace",
    }
}

/// GUI process: logs go to stdout, where processor traces belong.
pub fn init_gui(verbosity: u8) {
    init(verbosity, io::stdout);
}

/// Worker process: stdout carries image bytes, so logs go to stderr.
pub fn init_worker(verbosity: u8) {
    init(verbosity, io::stderr);
}

fn init<W>(verbosity: u8, writer: W)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .try_init();
}
