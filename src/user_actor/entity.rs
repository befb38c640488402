use chrono::Utc;

use super::error::UserError;
use crate::actor_framework::Entity;
use crate::domain::{normalize_email, User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreatePayload = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String {
        &self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - User creation parameters; the email is stored normalized
    fn from_create(id: String, params: UserCreate) -> Result<Self, UserError> {
        let email = normalize_email(&params.email);
        if params.name.trim().is_empty() {
            return Err(UserError::ValidationError("Please add a name".into()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::ValidationError("Please add a valid email".into()));
        }
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            email,
            password_hash: params.password_hash,
            role: params.role,
            phone: params.phone,
            created_at: Utc::now(),
        })
    }

    /// Updates the user's profile information or role.
    ///
    /// # Fields Updated
    /// - `name`: User's display name
    /// - `phone`: Contact number
    /// - `password_hash`: Replaced password
    /// - `role`: Admin promotion
    fn on_update(&mut self, patch: UserPatch) -> Result<(), UserError> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(UserError::ValidationError("Name cannot be blank".into()));
            }
            self.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        Ok(())
    }

    /// Currently, no custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
