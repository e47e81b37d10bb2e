use reqwest::multipart::{Form, Part};

use super::*;

impl LunaLinkApiClient {
    /// Fetch one page of the conversation with the partner.
    ///
    /// GET /chat/messages?partner_id=
    pub async fn get_messages(
        &self,
        partner_id: i64,
        page: Option<u32>,
    ) -> Result<MessagesPage, ClientError> {
        let mut query = vec![("partner_id", partner_id.to_string())];
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        self.get_json("/chat/messages", &query).await
    }

    /// Send a text message.
    ///
    /// POST /chat/send-message (JSON)
    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<ChatMessage, ClientError> {
        let resp: ActionResponse = self.post_json("/chat/send-message", message).await?;
        Self::sent_message(resp)
    }

    /// Send a media message.
    ///
    /// POST /chat/send-message (multipart)
    pub async fn send_media(&self, upload: MediaUpload) -> Result<ChatMessage, ClientError> {
        let message_type = upload.message_type();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let mut form = Form::new()
            .text("type", message_type)
            .part("file", part);
        if let Some(caption) = upload.caption {
            form = form.text("message", caption);
        }
        let resp: ActionResponse = self.post_multipart("/chat/send-message", form).await?;
        Self::sent_message(resp)
    }

    fn sent_message(resp: ActionResponse) -> Result<ChatMessage, ClientError> {
        let resp = resp.into_result()?;
        let message = resp
            .message
            .ok_or_else(|| ClientError::Rejected("Server did not echo the message".into()))?;
        Ok(serde_json::from_value(message)?)
    }

    /// List media shared with the partner, newest first.
    ///
    /// GET /chat/media?partner_id=
    pub async fn get_media(&self, partner_id: i64) -> Result<Vec<MediaItem>, ClientError> {
        let list: MediaList = self
            .get_json("/chat/media", &[("partner_id", partner_id.to_string())])
            .await?;
        Ok(list.media)
    }
}
