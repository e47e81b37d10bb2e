use super::*;

impl LunaLinkApiClient {
    /// Register a push subscription with the server.
    ///
    /// POST /api/push-subscribe
    pub async fn push_subscribe(
        &self,
        subscription: &PushSubscriptionDescriptor,
    ) -> Result<(), ClientError> {
        let _: ActionResponse = self.post_json("/api/push-subscribe", subscription).await?;
        tracing::debug!(endpoint = %subscription.endpoint, "Push subscription sent to server");
        Ok(())
    }

    /// Tell the server to drop a push subscription.
    ///
    /// POST /api/push-unsubscribe
    pub async fn push_unsubscribe(&self, endpoint: &str) -> Result<(), ClientError> {
        let req = UnsubscribeRequest {
            endpoint: endpoint.to_string(),
        };
        let _: ActionResponse = self.post_json("/api/push-unsubscribe", &req).await?;
        tracing::debug!(endpoint, "Push unsubscription sent to server");
        Ok(())
    }
}
