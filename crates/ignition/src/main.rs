//! Demo binary: boots the default provider set and runs until interrupted.

use std::sync::Arc;

use anyhow::Result;
use ignition_domain::value::shared;
use ignition_domain::{keys, HealthCheck};
use ignition_providers::default_providers;
use ignition_runtime::App;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::with_providers(default_providers());
    app.init();

    let check: HealthCheck = Arc::new(|| {
        debug!("health tick");
    });
    app.bind(keys::APP_HEALTH, shared(check));

    let stopper = app.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => stopper.stop(),
            Err(err) => error!(%err, "failed to listen for ctrl-c"),
        }
    });

    app.start_up().await;
    Ok(())
}
