use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Rendering pattern for timestamps in responses, e.g. "5 March, 2024 02:30 PM".
pub const DISPLAY_FORMAT: &str = "%-d %B, %Y %I:%M %p";

/// Asia/Kolkata, which observes no daylight saving.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 5 * 60 + 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Fields to overwrite on an existing contact. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn apply_to(self, contact: &mut Contact) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(message) = self.message {
            contact.message = message;
        }
    }
}

/// Raw form fields as submitted, for both create and update.
///
/// Each field is read on its own: falsy values (`null`, `false`, `0`, `""`)
/// count as absent and truthy scalars are kept as text, so one odd field
/// never discards the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default, deserialize_with = "truthy_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "truthy_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "truthy_text")]
    pub message: Option<String>,
}

fn truthy_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        // Falsy scalars, and nested values with no text form.
        Value::Null | Value::Bool(false) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            None
        }
    }
    .filter(|text| !text.is_empty()))
}

impl ContactInput {
    /// Returns `None` unless every field is present and non-empty.
    pub fn into_new_contact(self) -> Option<NewContact> {
        Some(NewContact {
            name: non_empty(self.name)?,
            email: non_empty(self.email)?,
            message: non_empty(self.message)?,
        })
    }

    /// Empty strings are dropped rather than clearing the stored field.
    pub fn into_changes(self) -> ContactChanges {
        ContactChanges {
            name: non_empty(self.name),
            email: non_empty(self.email),
            message: non_empty(self.message),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Renders timestamps in a single fixed display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormatter {
    offset: FixedOffset,
}

impl TimestampFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Returns `None` when the offset is out of range (beyond ±24h).
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub fn format(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(DISPLAY_FORMAT)
            .to_string()
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::from_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES)
            .unwrap_or_else(|| Self::new(Utc.fix()))
    }
}

/// Response shape of a contact. `updatedAt` is only present on single-record views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ContactView {
    pub fn summary(contact: Contact, timestamps: &TimestampFormatter) -> Self {
        Self {
            id: contact.id,
            created_at: timestamps.format(contact.created_at),
            updated_at: None,
            name: contact.name,
            email: contact.email,
            message: contact.message,
        }
    }

    pub fn detailed(contact: Contact, timestamps: &TimestampFormatter) -> Self {
        let updated_at = timestamps.format(contact.updated_at);
        Self {
            updated_at: Some(updated_at),
            ..Self::summary(contact, timestamps)
        }
    }
}
