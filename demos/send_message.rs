use std::io;

use smsgate::{Config, Message, SendOptions, SmsGatewayClient};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        EnvFilter::try_from_env("SMSGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let username = required_env("SMSGATE_USERNAME")?;
    let password = required_env("SMSGATE_PASSWORD")?;
    let phone = required_env("SMSGATE_PHONE")?;
    let text = std::env::var("SMSGATE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsgate demo.".to_owned());

    let config = Config::new()
        .with_base_url(std::env::var("SMSGATE_BASE_URL").unwrap_or_default())
        .with_basic_auth(username, password);
    let client = SmsGatewayClient::new(config)?;

    let message = Message::text(text, [phone])?.with_delivery_report(true);
    let state = client
        .send(&message, SendOptions::new().with_device_active_within(24))
        .await?;

    println!("id: {}, state: {}", state.id, state.state);
    for recipient in &state.recipients {
        println!("  {}: {}", recipient.phone_number, recipient.state);
    }

    Ok(())
}
