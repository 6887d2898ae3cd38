use std::{borrow::Cow, fs};

use clap::Parser;
use eyre::WrapErr;
use ethtrace_tracer::fixtures::SELF_TEST_CONFIG;
use tracing::info;

use crate::cli::{CLI, Options};

mod cli;
mod initializers;

fn main() -> eyre::Result<()> {
    let CLI { opts } = CLI::parse();
    initializers::init_tracing(&opts)?;
    run(&opts)
}

fn run(opts: &Options) -> eyre::Result<()> {
    let output = trace_config(opts)?;

    match &opts.output {
        Some(path) => {
            fs::write(path, &output)
                .wrap_err_with(|| format!("Failed to write results to {}", path.display()))?;
            info!(path = %path.display(), "Trace written");
        }
        None => println!("{output}"),
    }
    Ok(())
}

/// Traces the configured file, or the self-test configuration when none is given.
fn trace_config(opts: &Options) -> eyre::Result<String> {
    let config = match &opts.config {
        Some(path) => Cow::Owned(
            fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?,
        ),
        None => {
            info!("No config given, tracing the self-test configuration");
            Cow::Borrowed(SELF_TEST_CONFIG)
        }
    };

    Ok(ethtrace_ffi::create_trace(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ethtrace-{}-{name}", std::process::id()))
    }

    #[test]
    fn no_arguments_traces_self_test() {
        let opts = Options::default();
        assert_eq!(
            trace_config(&opts).unwrap(),
            ethtrace_ffi::create_trace(SELF_TEST_CONFIG).unwrap()
        );
        run(&opts).unwrap();
    }

    #[test]
    fn traces_config_file_into_output_file() {
        let config = temp_path("config.json");
        let output = temp_path("output.json");
        fs::write(&config, SELF_TEST_CONFIG).unwrap();

        let opts = Options {
            config: Some(config.clone()),
            output: Some(output.clone()),
            ..Default::default()
        };
        run(&opts).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, ethtrace_ffi::create_trace(SELF_TEST_CONFIG).unwrap());
        fs::remove_file(config).unwrap();
        fs::remove_file(output).unwrap();
    }

    #[test]
    fn malformed_config_is_an_error() {
        let config = temp_path("broken.json");
        fs::write(&config, "{").unwrap();

        let opts = Options {
            config: Some(config.clone()),
            output: Some(temp_path("unused.json")),
            ..Default::default()
        };
        let err = run(&opts).unwrap_err();
        assert!(err.to_string().starts_with("Failed to unmarshal config, err: "));
        fs::remove_file(config).unwrap();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let opts = Options {
            config: Some(temp_path("does-not-exist.json")),
            ..Default::default()
        };
        assert!(run(&opts).is_err());
    }
}
