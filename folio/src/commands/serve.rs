use folio_config::Config;
use folio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Preparing email transport");
    let email = email::connect(&config)?;
    if email.is_simulated() {
        warn!("Emails are only written to the log");
    } else if let Err(err) = email.ping().await {
        warn!("Failed to reach smtp server, contact messages cannot be delivered: {err}");
    }

    let server = environment::rest_server(&config, email)?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
