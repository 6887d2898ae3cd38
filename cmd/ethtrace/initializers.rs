use tracing_subscriber::{EnvFilter, filter::Directive, fmt};

use crate::cli::Options;

/// Installs the global subscriber. Logs go to stderr so stdout only ever
/// carries the trace output.
pub fn init_tracing(opts: &Options) -> eyre::Result<()> {
    let log_filter = EnvFilter::builder()
        .with_default_directive(Directive::from(opts.log_level))
        .from_env_lossy();

    let subscriber = fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
