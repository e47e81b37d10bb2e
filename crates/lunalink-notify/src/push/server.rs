use async_trait::async_trait;
use lunalink_client::api::LunaLinkApiClient;

use super::{Subscription, SubscriptionServer};
use crate::error::NotifyError;

#[async_trait]
impl SubscriptionServer for LunaLinkApiClient {
    async fn register_subscription(&self, subscription: &Subscription) -> Result<(), NotifyError> {
        self.push_subscribe(subscription).await?;
        Ok(())
    }

    async fn drop_subscription(&self, endpoint: &str) -> Result<(), NotifyError> {
        self.push_unsubscribe(endpoint).await?;
        Ok(())
    }
}
