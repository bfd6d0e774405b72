use std::path::PathBuf;

use bootstatus_core::PollerConfig;
use clap::Parser;
use log::LevelFilter;
use url::Url;

use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "bootstatus",
    version,
    about = "Follow an appliance's boot status page until it hands over to its portal"
)]
pub struct Cli {
    /// URL the status page is served from, e.g. http://192.168.1.10:5000/
    pub page_url: Url,

    /// Do not poll the status document
    #[arg(long)]
    pub no_poll: bool,

    /// Do not open the push channel
    #[arg(long)]
    pub no_push: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig::new(self.page_url.clone())
            .with_polling(!self.no_poll)
            .with_push_channel(!self.no_push)
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
