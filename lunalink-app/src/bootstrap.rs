use lunalink_client::api::LunaLinkApiClient;

use crate::config::AppConfig;

/// Foundation init (fatal on error): environment, config and API client.
pub fn init_foundation() -> Result<(AppConfig, LunaLinkApiClient), anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load()?;
    if let Err(e) = config.require_session() {
        tracing::warn!("{e}; requests will be sent without a session");
    }
    if config.partner_id.is_none() {
        tracing::warn!("No partner configured; presence updates are shown for everyone");
    }

    let api = LunaLinkApiClient::new(config.server_url.as_str(), config.session_cookie.clone())?;

    tracing::info!(server = %config.server_url, "Settings loaded");
    Ok((config, api))
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
