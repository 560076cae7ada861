use std::io;

use smsgate::{Config, ProcessingState, SmsGatewayClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_env("SMSGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let token = std::env::var("SMSGATE_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSGATE_TOKEN environment variable is required",
        )
    })?;
    let ids_raw = std::env::var("SMSGATE_MESSAGE_IDS").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSGATE_MESSAGE_IDS environment variable is required (comma-separated ids)",
        )
    })?;

    let config = Config::new()
        .with_base_url(std::env::var("SMSGATE_BASE_URL").unwrap_or_default())
        .with_bearer_token(token);
    let client = SmsGatewayClient::new(config)?;

    for id in ids_raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        match client.get_state(id).await {
            Ok(state) => {
                let since = state
                    .entered_at(state.state)
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| "-".to_owned());
                let done = if state.state.is_final() { "final" } else { "in progress" };
                println!("{id}: {} since {since} ({done})", state.state);
                if state.state == ProcessingState::Failed {
                    for recipient in &state.recipients {
                        println!("  {}: {:?}", recipient.phone_number, recipient.error);
                    }
                }
            }
            Err(err) if err.is_client_error() => println!("{id}: {err}"),
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
