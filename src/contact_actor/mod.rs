use chrono::Utc;
use thiserror::Error;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{ContactCreate, ContactMessage, ContactPatch, ContactStatus};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContactError {
    #[error("Message not found")]
    NotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ContactError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}

impl Entity for ContactMessage {
    type Id = String;
    type CreatePayload = ContactCreate;
    type Patch = ContactPatch;
    type Action = ();
    type ActionResult = ();
    type Error = ContactError;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, params: ContactCreate) -> Result<Self, ContactError> {
        let required = [
            ("name", &params.name),
            ("email", &params.email),
            ("subject", &params.subject),
            ("message", &params.message),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ContactError::ValidationError(format!("Please add a {field}")));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            subject: params.subject,
            message: params.message,
            status: ContactStatus::New,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: ContactPatch) -> Result<(), ContactError> {
        self.status = patch.status;
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), ContactError> {
        Ok(())
    }
}
