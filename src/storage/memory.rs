use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ContactStore;
use crate::{
    error::{AppError, AppResult},
    models::{Contact, ContactChanges, NewContact},
};

/// Process-local contact store. Records are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    contacts: Arc<RwLock<Vec<Contact>>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Vec<Contact>>> {
        self.contacts.read().map_err(|err| poisoned(&err))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Vec<Contact>>> {
        self.contacts.write().map_err(|err| poisoned(&err))
    }
}

fn poisoned(err: &dyn std::fmt::Display) -> AppError {
    AppError::Internal(anyhow::anyhow!("contact store lock poisoned: {err}"))
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            created_at: now,
            updated_at: now,
        };

        self.write()?.push(contact.clone());
        Ok(contact)
    }

    async fn find_all(&self) -> AppResult<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self.read()?.iter().rev().cloned().collect();
        // Stable sort keeps the reversed insertion order among equal timestamps.
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contacts)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>> {
        Ok(self.read()?.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: ContactChanges) -> AppResult<Option<Contact>> {
        let mut contacts = self.write()?;
        let Some(contact) = contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        changes.apply_to(contact);
        contact.updated_at = Utc::now().max(contact.updated_at);
        Ok(Some(contact.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut contacts = self.write()?;
        match contacts.iter().position(|c| c.id == id) {
            Some(index) => {
                contacts.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn submission(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: format!("Hello from {name}"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_equal_timestamps() {
        let store = InMemoryContactStore::new();

        let contact = store.insert(submission("Ann")).await.unwrap();

        assert_eq!(contact.name, "Ann");
        assert_eq!(contact.created_at, contact.updated_at);
        assert_eq!(store.find_by_id(contact.id).await.unwrap(), Some(contact));
    }

    #[tokio::test]
    async fn find_all_returns_newest_first() {
        let store = InMemoryContactStore::new();
        let first = store.insert(submission("Ann")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = store.insert(submission("Bob")).await.unwrap();

        let ids: Vec<Uuid> = store.find_all().await.unwrap().iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_reverse_insertion_order() {
        let store = InMemoryContactStore::new();
        let first = store.insert(submission("Ann")).await.unwrap();
        let second = store.insert(submission("Bob")).await.unwrap();
        {
            let mut contacts = store.write().unwrap();
            for contact in contacts.iter_mut() {
                contact.created_at = first.created_at;
            }
        }

        let ids: Vec<Uuid> = store.find_all().await.unwrap().iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let store = InMemoryContactStore::new();

        let updated = store
            .update(Uuid::new_v4(), ContactChanges::default())
            .await
            .unwrap();

        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let store = InMemoryContactStore::new();
        let contact = store.insert(submission("Ann")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        let updated = store
            .update(
                contact.id,
                ContactChanges {
                    name: Some("Annie".to_string()),
                    ..ContactChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Annie");
        assert_eq!(updated.email, contact.email);
        assert_eq!(updated.created_at, contact.created_at);
        assert!(updated.updated_at > contact.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_record_once() {
        let store = InMemoryContactStore::new();
        let contact = store.insert(submission("Ann")).await.unwrap();

        assert!(store.delete(contact.id).await.unwrap());
        assert!(!store.delete(contact.id).await.unwrap());
        assert!(store.find_by_id(contact.id).await.unwrap().is_none());
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
