use std::sync::Arc;

use flowwave::config::{Settings, load_automation_config};
use flowwave::routes::{AppState, routes};
use flowwave::transport::{MessageTransport, TwilioClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let settings = Settings::from_env();

    eprintln!("🌊 flowwave v{}", env!("CARGO_PKG_VERSION"));

    // Fail fast: a config with violations never reaches the matcher.
    let config = load_automation_config(settings.config_path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: automation config rejected:\n{e}");
        std::process::exit(1);
    });
    match &settings.config_path {
        Some(path) => eprintln!("   Config: {} ({} flows)", path.display(), config.flows.len()),
        None => eprintln!("   Config: built-in sample ({} flows)", config.flows.len()),
    }

    // Conditionally enable the Twilio transport if credentials are set
    let transport: Option<Arc<dyn MessageTransport>> = match TwilioClient::from_env() {
        Some(client) => {
            eprintln!("   Twilio: enabled (handoff + /api/send)");
            Some(Arc::new(client))
        }
        None => {
            eprintln!("   Twilio: disabled (set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_WHATSAPP_NUMBER)");
            None
        }
    };

    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", settings.port);
    eprintln!("   Simulate: http://0.0.0.0:{}/api/simulate\n", settings.port);

    let state = AppState {
        config: Arc::new(config),
        transport,
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port)).await?;
    tracing::info!(port = settings.port, "flowwave server started");
    axum::serve(listener, routes(state)).await?;

    Ok(())
}
