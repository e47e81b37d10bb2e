use super::*;

impl LunaLinkApiClient {
    /// POST /dashboard/add-mood
    pub async fn add_mood(&self, mood: &MoodRequest) -> Result<ActionResponse, ClientError> {
        let resp: ActionResponse = self.post_json("/dashboard/add-mood", mood).await?;
        resp.into_result()
    }

    /// POST /dashboard/add-note
    pub async fn add_note(&self, note: &NoteRequest) -> Result<ActionResponse, ClientError> {
        let resp: ActionResponse = self.post_json("/dashboard/add-note", note).await?;
        resp.into_result()
    }

    /// POST /dashboard/add-anniversary
    pub async fn add_anniversary(
        &self,
        anniversary: &AnniversaryRequest,
    ) -> Result<ActionResponse, ClientError> {
        let resp: ActionResponse = self
            .post_json("/dashboard/add-anniversary", anniversary)
            .await?;
        resp.into_result()
    }

    /// POST /dashboard/virtual-hug
    pub async fn send_virtual_hug(&self, partner_id: i64) -> Result<ActionResponse, ClientError> {
        let resp: ActionResponse = self
            .post_json("/dashboard/virtual-hug", &HugRequest { partner_id })
            .await?;
        resp.into_result()
    }
}
