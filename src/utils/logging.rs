use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `warn`, or `debug`
/// with `--verbose`. Output goes to stderr so table/JSON output stays clean.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. in tests) is harmless; keep the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "visearch=debug" } else { "visearch=warn" }
}

pub fn print_verbose(verbose: bool, msg: &str) {
    if verbose {
        eprintln!("Verbose: {}", msg);
    }
}
