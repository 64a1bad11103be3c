use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contact, ContactChanges, NewContact},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryContactStore;
pub use postgres::PgContactStore;

/// Persistence contract for contact records.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Stores a new contact, assigning its id and both timestamps.
    async fn insert(&self, contact: NewContact) -> AppResult<Contact>;

    /// Returns every contact, newest first. Ties keep reverse insertion order.
    async fn find_all(&self) -> AppResult<Vec<Contact>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>>;

    /// Overwrites the supplied fields and refreshes `updated_at`.
    ///
    /// Returns `None` when no contact has this id.
    async fn update(&self, id: Uuid, changes: ContactChanges) -> AppResult<Option<Contact>>;

    /// Returns `false` when no contact has this id.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Store double whose every call fails, for exercising the server error path.
#[cfg(test)]
pub(crate) struct UnavailableStore;

#[cfg(test)]
impl UnavailableStore {
    pub(crate) const MESSAGE: &'static str = "store unavailable";

    fn fail<T>() -> AppResult<T> {
        Err(anyhow::anyhow!(Self::MESSAGE).into())
    }
}

#[cfg(test)]
#[async_trait]
impl ContactStore for UnavailableStore {
    async fn insert(&self, _contact: NewContact) -> AppResult<Contact> {
        Self::fail()
    }

    async fn find_all(&self) -> AppResult<Vec<Contact>> {
        Self::fail()
    }

    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Contact>> {
        Self::fail()
    }

    async fn update(&self, _id: Uuid, _changes: ContactChanges) -> AppResult<Option<Contact>> {
        Self::fail()
    }

    async fn delete(&self, _id: Uuid) -> AppResult<bool> {
        Self::fail()
    }
}
