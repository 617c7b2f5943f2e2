use std::process::ExitCode;

use log::LevelFilter;
use portal_probe::config::load_config;
use portal_probe::{NetworkMonitor, ProbeClass};
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()
    {
        eprintln!("Failed to initialise logging: {e}");
    }

    let monitor = match load_config().and_then(NetworkMonitor::new) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = monitor.send_probe().await;
    let url = outcome.probed_url().unwrap_or("-");
    match outcome.class() {
        ProbeClass::Successful => {
            println!("✅ Internet available (via {url})");
            ExitCode::SUCCESS
        }
        ProbeClass::Portal => {
            println!(
                "🔒 Captive portal, sign in at {} (status {} from {url})",
                outcome.redirect_target().unwrap_or("<no redirect>"),
                outcome.status_code()
            );
            ExitCode::from(2)
        }
        ProbeClass::Failed => {
            println!("❌ No connectivity (status {} from {url})", outcome.status_code());
            ExitCode::FAILURE
        }
    }
}
