use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Contact, ContactInput},
    storage::ContactStore,
};

pub struct ContactsService {
    store: Arc<dyn ContactStore>,
}

impl ContactsService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Store a new form submission
    pub async fn create_contact(&self, input: ContactInput) -> AppResult<Contact> {
        let new_contact = input
            .into_new_contact()
            .ok_or_else(|| AppError::Validation("All fields are required".to_string()))?;

        let contact = self.store.insert(new_contact).await?;
        tracing::debug!(contact_id = %contact.id, "Contact created");

        Ok(contact)
    }

    /// Get all contacts, newest first
    pub async fn get_contacts(&self) -> AppResult<Vec<Contact>> {
        self.store.find_all().await
    }

    /// Get a specific contact
    pub async fn get_contact(&self, id: &str) -> AppResult<Contact> {
        let id = parse_contact_id(id)?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::ContactNotFound)
    }

    /// Update contact
    pub async fn update_contact(&self, id: &str, input: ContactInput) -> AppResult<Contact> {
        // Validate input before touching the store
        let changes = input.into_changes();
        if changes.is_empty() {
            return Err(AppError::Validation(
                "At least one field is required to update".to_string(),
            ));
        }

        let id = parse_contact_id(id)?;
        let contact = self
            .store
            .update(id, changes)
            .await?
            .ok_or(AppError::ContactNotFound)?;
        tracing::debug!(contact_id = %contact.id, "Contact updated");

        Ok(contact)
    }

    /// Delete contact
    pub async fn delete_contact(&self, id: &str) -> AppResult<()> {
        let id = parse_contact_id(id)?;

        if !self.store.delete(id).await? {
            return Err(AppError::ContactNotFound);
        }
        tracing::debug!(contact_id = %id, "Contact deleted");

        Ok(())
    }
}

/// A malformed id cannot name a stored contact.
fn parse_contact_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::ContactNotFound)
}
