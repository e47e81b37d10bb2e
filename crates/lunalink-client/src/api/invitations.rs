use super::*;

impl LunaLinkApiClient {
    /// GET /chat/email-status
    pub async fn email_status(&self) -> Result<EmailStatus, ClientError> {
        self.get_json("/chat/email-status", &[]).await
    }

    /// POST /chat/send-invitation
    pub async fn send_invitation(&self, email: &str) -> Result<ActionResponse, ClientError> {
        let req = InvitationRequest {
            email: email.to_string(),
        };
        let resp: ActionResponse = self.post_json("/chat/send-invitation", &req).await?;
        resp.into_result()
    }

    /// POST /chat/send-test-email
    pub async fn send_test_email(&self, email: &str) -> Result<ActionResponse, ClientError> {
        let req = TestEmailRequest {
            test_email: email.to_string(),
        };
        let resp: ActionResponse = self.post_json("/chat/send-test-email", &req).await?;
        resp.into_result()
    }
}
