use crate::records::{self, is_safe_id, record_path};
use crate::{RecordKind, Result, Store, StoreError};
use chatmate_core::{Chat, Contact, ContactPatch, NewContact};
use serde::Serialize;

/// Outcome of deleting a contact together with the chats it owned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedContact {
    pub id: String,
    pub deleted: bool,
    pub chats_deleted: usize,
}

impl Store {
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut contacts: Vec<Contact> = records::read_all(&self.contacts_dir()).await?;
        contacts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(contacts)
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        if !is_safe_id(id) {
            return Err(StoreError::not_found(RecordKind::Contact, id));
        }
        records::read(&record_path(&self.contacts_dir(), id))
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Contact, id))
    }

    pub async fn contact_exists(&self, id: &str) -> Result<bool> {
        match self.get_contact(id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn create_contact(&self, input: NewContact) -> Result<Contact> {
        let contact = Contact::create(input)?;
        let _guard = self.locks.acquire(RecordKind::Contact, &contact.id).await;
        records::write(&record_path(&self.contacts_dir(), &contact.id), &contact).await?;
        tracing::debug!(id = %contact.id, name = %contact.name, "contact created");
        Ok(contact)
    }

    pub async fn update_contact(&self, id: &str, patch: ContactPatch) -> Result<Contact> {
        if !is_safe_id(id) {
            return Err(StoreError::not_found(RecordKind::Contact, id));
        }
        let guard = self.locks.acquire(RecordKind::Contact, id).await;
        let mut contact = match self.get_contact(id).await {
            Ok(contact) => contact,
            Err(e) => {
                if e.is_not_found() {
                    self.locks.release_missing(guard, RecordKind::Contact, id);
                }
                return Err(e);
            }
        };
        contact.apply(patch)?;
        records::write(&record_path(&self.contacts_dir(), id), &contact).await?;
        Ok(contact)
    }

    /// Delete a contact and every chat it owns.
    pub async fn delete_contact(&self, id: &str) -> Result<DeletedContact> {
        if !is_safe_id(id) {
            return Err(StoreError::not_found(RecordKind::Contact, id));
        }
        let guard = self.locks.acquire(RecordKind::Contact, id).await;
        // Existence check first so a bad id is a 404, not a silent no-op.
        if let Err(e) = self.get_contact(id).await {
            if e.is_not_found() {
                self.locks.release_missing(guard, RecordKind::Contact, id);
            }
            return Err(e);
        }

        let owned: Vec<Chat> = self.chats_for(id).await?;
        let mut chats_deleted = 0;
        for chat in owned {
            if self.remove_chat_record(&chat.id).await? {
                chats_deleted += 1;
            }
        }

        records::remove(&record_path(&self.contacts_dir(), id)).await?;
        self.locks.release_missing(guard, RecordKind::Contact, id);
        tracing::debug!(id, chats_deleted, "contact deleted");

        Ok(DeletedContact {
            id: id.to_string(),
            deleted: true,
            chats_deleted,
        })
    }
}
