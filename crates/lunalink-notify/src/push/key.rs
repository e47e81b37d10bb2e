use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::NotifyError;

/// Decode the server's URL-safe base64 application key. Trailing `=`
/// padding is optional, as browsers accept both forms.
pub fn decode_server_key(key: &str) -> Result<Vec<u8>, NotifyError> {
    let trimmed = key.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(NotifyError::InvalidKey("empty key".into()));
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| NotifyError::InvalidKey(e.to_string()))?;
    Ok(bytes)
}
