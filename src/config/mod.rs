#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

pub use toml_config::ConsoleConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::cli::Command;
    use super::toml_config::ConsoleConfig;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "hub-console")]
    #[command(about = "Configure a sensor hub through its web API")]
    pub struct CliConfig {
        /// Base URL of the hub, e.g. http://192.168.4.1
        #[arg(long, global = true)]
        pub device_url: Option<String>,

        /// Console settings file (TOML)
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        #[arg(long, global = true)]
        pub timeout_seconds: Option<u64>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log as JSON lines")]
        pub log_json: bool,

        /// Answer yes to confirmation prompts
        #[arg(short = 'y', long, global = true)]
        pub yes: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    impl CliConfig {
        /// 載入設定檔並套用命令列覆蓋設定
        pub fn resolve(&self) -> Result<ConsoleConfig> {
            let mut config = match &self.config {
                Some(path) => {
                    tracing::debug!("Loading console settings from {}", path.display());
                    ConsoleConfig::from_file(path)?
                }
                None => ConsoleConfig::default(),
            };

            if let Some(url) = &self.device_url {
                config.device.url = url.clone();
            }
            if let Some(timeout) = self.timeout_seconds {
                config.device.timeout_seconds = Some(timeout);
            }

            config.validate()?;
            Ok(config)
        }
    }

}
