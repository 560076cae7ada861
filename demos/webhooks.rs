use std::io;

use smsgate::{Config, SmsGatewayClient, Webhook, WebhookEvent};
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

    let config = Config::new()
        .with_base_url(std::env::var("SMSGATE_BASE_URL").unwrap_or_default())
        .with_basic_auth(
            required_env("SMSGATE_USERNAME")?,
            required_env("SMSGATE_PASSWORD")?,
        );
    let client = SmsGatewayClient::new(config)?;

    if let Ok(url) = std::env::var("SMSGATE_WEBHOOK_URL") {
        let event = std::env::var("SMSGATE_WEBHOOK_EVENT")
            .map(WebhookEvent::from)
            .unwrap_or(WebhookEvent::SmsReceived);
        let registered = client.register_webhook(&Webhook::new(url, event)).await?;
        println!("registered {} for {}", registered.id, registered.event);
    }

    for webhook in client.list_webhooks().await? {
        let device = webhook.device_id.as_deref().unwrap_or("all devices");
        println!("{} {} -> {} ({device})", webhook.id, webhook.event, webhook.url);
    }

    if let Ok(id) = std::env::var("SMSGATE_DELETE_WEBHOOK") {
        client.delete_webhook(&id).await?;
        println!("deleted {id}");
    }

    Ok(())
}
