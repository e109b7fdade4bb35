use clap::Parser;
use tokio_util::sync::CancellationToken;
use txn_loadgen::utils::{logger, shutdown, validation::Validate};
use txn_loadgen::{CliConfig, LoadDriver, ReqwestTransport, TokioPacer};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting txn-loadgen");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let driver_config = config.driver_config();
    let transport = match ReqwestTransport::new(driver_config.request_timeout) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown_token = CancellationToken::new();
    let _signal_listener = shutdown::cancel_on_signal(shutdown_token.clone());

    let driver = LoadDriver::new(driver_config, transport, TokioPacer, shutdown_token);

    match driver.run().await {
        Ok(_) => {
            println!("Load driver stopped by user.");
        }
        Err(e) => {
            tracing::error!("❌ Load driver aborted: {}", e);
            eprintln!("❌ {}", e);

            // 傳輸錯誤與其他錯誤使用不同的退出碼
            let exit_code = if e.is_transport() { 2 } else { 1 };
            std::process::exit(exit_code);
        }
    }
}
