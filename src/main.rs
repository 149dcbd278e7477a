use clap::Parser;
use hub_console::utils::logger;
use hub_console::{CliConfig, Console, ConsoleStatus, HttpDeviceClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("📡 Talking to {}", settings.device.url);

    let status = ConsoleStatus::new();
    let client = match settings.timeout() {
        Some(timeout) => HttpDeviceClient::with_timeout(&settings.device.url, timeout, status),
        None => HttpDeviceClient::new(&settings.device.url, status),
    }?;

    let console = Console::new(&client, settings).assume_yes(cli.yes);

    match console.run(&cli.command).await {
        Ok(output) => {
            print!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 裝置回覆的錯誤訊息已由狀態列輸出
            if !matches!(
                e,
                hub_console::HubError::DeviceError { .. } | hub_console::HubError::InsufficientStorage
            ) {
                eprintln!("❌ {}", e.user_friendly_message());
            }

            std::process::exit(e.severity().exit_code());
        }
    }

    Ok(())
}
