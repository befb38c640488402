use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, DTOs, and Actions)
// =============================================================================

/// Failures raised by the store itself, independent of any entity.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate key: {0}")]
    Conflict(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any document kept in a [`ResourceActor`] must implement.
///
/// Every mutation of a document (create, update, action) runs inside the
/// owning actor task, one message at a time. An action is therefore an atomic
/// read-check-write on a single document.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    type Error: Send + Sync + Debug + From<FrameworkError>;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Secondary key that must be unique across the collection (email, slug, owner).
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

/// Predicate used by `List` requests. Evaluated inside the actor.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    FindByKey {
        key: String,
        respond_to: Response<Option<T>, T::Error>,
    },
    /// Returns the document holding `key`, creating it from `payload` when absent.
    Ensure {
        key: String,
        payload: T::CreatePayload,
        respond_to: Response<T, T::Error>,
    },
    List {
        filter: Option<Filter<T>>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    keys: HashMap<String, T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            keys: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", fields(collection = self.name), skip(self))]
    pub async fn run(mut self) {
        info!("Store starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::FindByKey { key, respond_to } => {
                    let item = self.keys.get(&key).and_then(|id| self.store.get(id)).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Ensure { key, payload, respond_to } => {
                    let existing = self.keys.get(&key).and_then(|id| self.store.get(id)).cloned();
                    let result = match existing {
                        Some(item) => Ok(item),
                        None => self.create(payload),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self
                        .store
                        .values()
                        .filter(|item| filter.as_ref().map_or(true, |f| f(*item)))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action),
                        None => Err(FrameworkError::NotFound(id.to_string()).into()),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!("Store stopped");
    }

    fn create(&mut self, payload: T::CreatePayload) -> Result<T, T::Error> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload)?;
        item.on_create()?;
        if let Some(key) = item.unique_key() {
            if self.keys.contains_key(&key) {
                debug!(key = %key, "Rejecting duplicate key");
                return Err(FrameworkError::Conflict(key).into());
            }
            self.keys.insert(key, id.clone());
        }
        debug!(id = %id, "Document created");
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        let Some(current) = self.store.get(&id) else {
            return Err(FrameworkError::NotFound(id.to_string()).into());
        };
        let old_key = current.unique_key();
        let mut updated = current.clone();
        updated.on_update(patch)?;

        let new_key = updated.unique_key();
        if new_key != old_key {
            if let Some(key) = &new_key {
                if self.keys.get(key).is_some_and(|owner| owner != &id) {
                    warn!(key = %key, "Update would duplicate a unique key");
                    return Err(FrameworkError::Conflict(key.clone()).into());
                }
            }
            if let Some(key) = old_key {
                self.keys.remove(&key);
            }
            if let Some(key) = new_key {
                self.keys.insert(key, id.clone());
            }
        }
        self.store.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&mut self, id: T::Id) -> Result<(), T::Error> {
        let Some(item) = self.store.get(&id) else {
            return Err(FrameworkError::NotFound(id.to_string()).into());
        };
        item.on_delete()?;
        if let Some(key) = item.unique_key() {
            self.keys.remove(&key);
        }
        self.store.remove(&id);
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| T::Error::from(FrameworkError::ActorClosed))?;
        response
            .await
            .map_err(|_| T::Error::from(FrameworkError::ActorDropped))?
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn find_by_key(&self, key: impl Into<String>) -> Result<Option<T>, T::Error> {
        let key = key.into();
        self.call(|respond_to| ResourceRequest::FindByKey { key, respond_to }).await
    }

    pub async fn ensure(
        &self,
        key: impl Into<String>,
        payload: T::CreatePayload,
    ) -> Result<T, T::Error> {
        let key = key.into();
        self.call(|respond_to| ResourceRequest::Ensure { key, payload, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, T::Error> {
        self.call(|respond_to| ResourceRequest::List { filter: None, respond_to }).await
    }

    pub async fn list_where(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, T::Error> {
        let filter: Filter<T> = Box::new(filter);
        self.call(|respond_to| ResourceRequest::List { filter: Some(filter), respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, T::Error> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.call(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
