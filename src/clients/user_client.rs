use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{normalize_email, ProfileUpdate, Registration, Role, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
    bootstrap_admin: Option<String>,
}

impl_client_methods!(UserClient, User, UserError, user, UserError::NotFound);

impl UserClient {
    /// `bootstrap_admin` is an email address that is granted the admin role
    /// when it registers.
    pub fn new(inner: ResourceClient<User>, bootstrap_admin: Option<String>) -> Self {
        Self { inner, bootstrap_admin: bootstrap_admin.map(|email| normalize_email(&email)) }
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration) -> Result<User, UserError> {
        debug!("Sending request");
        check_password(&registration.password)?;
        let email = normalize_email(&registration.email);
        let role = if self.bootstrap_admin.as_deref() == Some(email.as_str()) {
            warn!("Registering bootstrap administrator");
            Role::Admin
        } else {
            Role::Customer
        };
        let payload = UserCreate {
            name: registration.name,
            email,
            password_hash: hash(&registration.password)?,
            role,
            phone: registration.phone.filter(|p| !p.trim().is_empty()),
        };
        let user = self.inner.create(payload).await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Returns `None` when the email is unknown or the password is wrong.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let user = self.inner.find_by_key(normalize_email(email)).await?;
        Ok(user.filter(|u| verify_password(password, &u.password_hash)))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, id: String, update: ProfileUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        let password_hash = match update.password {
            Some(password) => {
                check_password(&password)?;
                Some(hash(&password)?)
            }
            None => None,
        };
        let patch = UserPatch { name: update.name, phone: update.phone, password_hash, role: None };
        self.inner.update(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn promote(&self, id: String) -> Result<User, UserError> {
        debug!("Sending request");
        let user = self
            .inner
            .update(id, UserPatch { role: Some(Role::Admin), ..Default::default() })
            .await?;
        info!(user_id = %user.id, email = %user.email, "User promoted to admin");
        Ok(user)
    }
}

fn hash(password: &str) -> Result<String, UserError> {
    hash_password(password).map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn check_password(password: &str) -> Result<(), UserError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
