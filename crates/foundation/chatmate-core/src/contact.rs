//! Contacts - the chat partners a user sets up

use crate::{Error, Personality, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub personality: Personality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a create request. Fields are optional so presence can be
/// reported as a validation error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn required(value: Option<&str>, field: &'static str) -> Result<String> {
    let value = value.ok_or(Error::MissingField(field))?;
    non_blank(value, field)
}

fn non_blank(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::BlankField { field });
    }
    Ok(trimmed.to_string())
}

impl Contact {
    /// Validate a create request and build the record.
    pub fn create(input: NewContact) -> Result<Self> {
        let name = required(input.name.as_deref(), "name")?;
        let personality = required(input.personality.as_deref(), "personality")?;
        let now = crate::now();

        Ok(Self {
            id: crate::new_id(),
            name,
            personality: Personality::parse(&personality),
            avatar: input.avatar.filter(|a| !a.trim().is_empty()),
            description: input.description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Provided fields must not be blank.
    pub fn apply(&mut self, patch: ContactPatch) -> Result<()> {
        let name = patch.name.as_deref().map(|n| non_blank(n, "name")).transpose()?;
        let personality = patch
            .personality
            .as_deref()
            .map(|p| non_blank(p, "personality"))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(personality) = personality {
            self.personality = Personality::parse(&personality);
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar).filter(|a| !a.trim().is_empty());
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        self.updated_at = crate::now();
        Ok(())
    }
}
