use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::contact_actor::ContactError;
use crate::domain::{ContactCreate, ContactMessage, ContactPatch, ContactStatus};

#[derive(Clone)]
pub struct ContactClient {
    inner: ResourceClient<ContactMessage>,
}

impl_client_new!(ContactClient, ContactMessage);

impl ContactClient {
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn submit(&self, message: ContactCreate) -> Result<ContactMessage, ContactError> {
        debug!("Sending request");
        let stored = self.inner.create(message).await?;
        info!(message_id = %stored.id, "Contact message received");
        Ok(stored)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_messages(&self) -> Result<Vec<ContactMessage>, ContactError> {
        debug!("Sending request");
        let mut messages = self.inner.list().await?;
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: String, status: ContactStatus) -> Result<ContactMessage, ContactError> {
        debug!("Sending request");
        self.inner.update(id, ContactPatch { status }).await
    }
}
