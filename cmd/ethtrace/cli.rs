use std::path::PathBuf;

use clap::Parser as ClapParser;
use tracing::Level;

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

#[allow(clippy::upper_case_acronyms)]
#[derive(ClapParser)]
#[command(name = "ethtrace", author, version = VERSION_STRING, about = "Traces EVM transactions into geth-style struct logs", long_about = None)]
pub struct CLI {
    #[clap(flatten)]
    pub opts: Options,
}

#[derive(ClapParser, Debug)]
pub struct Options {
    #[arg(
        long = "config",
        value_name = "PATH",
        help = "JSON trace configuration to run. Without it the built-in self-test configuration is traced."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long = "output",
        value_name = "PATH",
        help = "Write the results to this file instead of stdout."
    )]
    pub output: Option<PathBuf>,
    #[arg(long = "log.level", default_value_t = Level::INFO, value_name = "LOG_LEVEL")]
    pub log_level: Level,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            output: None,
            log_level: Level::INFO,
        }
    }
}
