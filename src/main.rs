use clap::Parser;
use review_assign_lib::config::Config;
use std::process::exit;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    if let Err(err) = config.start_logger() {
        eprintln!("Logging couldn't start: {}", err);
    }

    let cancel = CancellationToken::new();
    tokio::spawn(wait_for_signal(cancel.clone()));

    if let Err(err) = review_assign_lib::run(config, cancel).await {
        log::error!("{}", err);
        exit(1);
    }
}

/// Cancel `token` on Ctrl-C or, on Unix, SIGTERM.
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl-C"),
        _ = terminate => log::info!("Received SIGTERM"),
    }

    token.cancel();
}
