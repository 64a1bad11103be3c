use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ContactStore;
use crate::{
    error::AppResult,
    models::{Contact, ContactChanges, NewContact},
};

#[derive(Clone)]
pub struct PgContactStore {
    db: PgPool,
}

impl PgContactStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert(&self, contact: NewContact) -> AppResult<Contact> {
        // Both timestamps default to NOW(), which is fixed for the transaction.
        let contact: Contact = sqlx::query_as(
            r#"
            INSERT INTO contacts (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.message)
        .fetch_one(&self.db)
        .await?;

        Ok(contact)
    }

    async fn find_all(&self) -> AppResult<Vec<Contact>> {
        let contacts: Vec<Contact> = sqlx::query_as(
            r#"
            SELECT id, name, email, message, created_at, updated_at
            FROM contacts
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(contacts)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let contact: Option<Contact> = sqlx::query_as(
            "SELECT id, name, email, message, created_at, updated_at FROM contacts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(contact)
    }

    async fn update(&self, id: Uuid, changes: ContactChanges) -> AppResult<Option<Contact>> {
        let contact: Option<Contact> = sqlx::query_as(
            r#"
            UPDATE contacts
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                message = COALESCE($4, message),
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $1
            RETURNING id, name, email, message, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.message)
        .fetch_optional(&self.db)
        .await?;

        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(all(test, feature = "postgres-tests"))]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn submission(name: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: format!("Hello from {name}"),
        }
    }

    #[sqlx::test]
    async fn insert_sets_equal_timestamps(pool: PgPool) {
        let store = PgContactStore::new(pool);

        let contact = store.insert(submission("Ann")).await.unwrap();

        assert_eq!(contact.created_at, contact.updated_at);
        assert_eq!(store.find_by_id(contact.id).await.unwrap(), Some(contact));
    }

    #[sqlx::test]
    async fn find_all_breaks_timestamp_ties_by_reverse_insertion(pool: PgPool) {
        let store = PgContactStore::new(pool.clone());
        let ann = store.insert(submission("Ann")).await.unwrap();
        let bob = store.insert(submission("Bob")).await.unwrap();
        let cat = store.insert(submission("Cat")).await.unwrap();

        let tie = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        sqlx::query("UPDATE contacts SET created_at = $1")
            .bind(tie)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE contacts SET created_at = $1 WHERE id = $2")
            .bind(tie + chrono::Duration::minutes(1))
            .bind(ann.id)
            .execute(&pool)
            .await
            .unwrap();

        let ids: Vec<Uuid> = store.find_all().await.unwrap().iter().map(|c| c.id).collect();

        assert_eq!(ids, vec![ann.id, cat.id, bob.id]);
    }

    #[sqlx::test]
    async fn update_overwrites_only_supplied_fields(pool: PgPool) {
        let store = PgContactStore::new(pool);
        let contact = store.insert(submission("Ann")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;

        let updated = store
            .update(
                contact.id,
                ContactChanges {
                    email: Some("new@example.com".to_string()),
                    ..ContactChanges::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, contact.name);
        assert_eq!(updated.message, contact.message);
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.created_at, contact.created_at);
        assert!(updated.updated_at > contact.updated_at);
    }

    #[sqlx::test]
    async fn update_never_moves_updated_at_backwards(pool: PgPool) {
        let store = PgContactStore::new(pool.clone());
        let contact = store.insert(submission("Ann")).await.unwrap();
        let later = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();
        sqlx::query("UPDATE contacts SET updated_at = $1 WHERE id = $2")
            .bind(later)
            .bind(contact.id)
            .execute(&pool)
            .await
            .unwrap();

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
        assert_eq!(updated.updated_at, later);
    }

    #[sqlx::test]
    async fn unknown_ids_report_missing(pool: PgPool) {
        let store = PgContactStore::new(pool);
        let contact = store.insert(submission("Ann")).await.unwrap();

        assert!(store
            .update(Uuid::new_v4(), ContactChanges::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete(contact.id).await.unwrap());
        assert!(!store.delete(contact.id).await.unwrap());
        assert!(store.find_by_id(contact.id).await.unwrap().is_none());
    }
}
