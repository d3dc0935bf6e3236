use crate::records::{self, is_safe_id, record_path};
use crate::{RecordKind, Result, Store, StoreError};
use chatmate_core::{Chat, ChatSummary, Message};

impl Store {
    /// Chats owned by one contact, oldest first.
    pub(crate) async fn chats_for(&self, contact_id: &str) -> Result<Vec<Chat>> {
        let mut chats: Vec<Chat> = records::read_all(&self.chats_dir()).await?;
        chats.retain(|c| c.contact_id == contact_id);
        sort_chats(&mut chats);
        Ok(chats)
    }

    /// Summaries of one contact's chats, or of every chat when no contact is given.
    pub async fn list_chats(&self, contact_id: Option<&str>) -> Result<Vec<ChatSummary>> {
        let chats = match contact_id {
            Some(id) => {
                if !self.contact_exists(id).await? {
                    return Err(StoreError::not_found(RecordKind::Contact, id));
                }
                self.chats_for(id).await?
            }
            None => {
                let mut all: Vec<Chat> = records::read_all(&self.chats_dir()).await?;
                sort_chats(&mut all);
                all
            }
        };
        Ok(chats.iter().map(Chat::summary).collect())
    }

    pub async fn get_chat(&self, id: &str) -> Result<Chat> {
        if !is_safe_id(id) {
            return Err(StoreError::not_found(RecordKind::Chat, id));
        }
        records::read(&record_path(&self.chats_dir(), id))
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Chat, id))
    }

    /// Start an empty chat with an existing contact.
    pub async fn create_chat(&self, contact_id: &str, title: Option<String>) -> Result<Chat> {
        if !is_safe_id(contact_id) {
            return Err(StoreError::not_found(RecordKind::Contact, contact_id));
        }
        let guard = self.locks.acquire(RecordKind::Contact, contact_id).await;
        match self.create_chat_locked(contact_id, title).await {
            Err(e) if e.is_not_found() => {
                self.locks.release_missing(guard, RecordKind::Contact, contact_id);
                Err(e)
            }
            other => other,
        }
    }

    async fn create_chat_locked(&self, contact_id: &str, title: Option<String>) -> Result<Chat> {
        if !self.contact_exists(contact_id).await? {
            return Err(StoreError::not_found(RecordKind::Contact, contact_id));
        }
        let chat = Chat::new(contact_id, title);
        records::write(&record_path(&self.chats_dir(), &chat.id), &chat).await?;
        tracing::debug!(id = %chat.id, contact_id, "chat created");
        Ok(chat)
    }

    /// The contact's most recently active chat, created on first open.
    pub async fn open_chat_for_contact(&self, contact_id: &str) -> Result<Chat> {
        let _contact = self.locks.acquire(RecordKind::Contact, contact_id).await;
        let latest = self
            .chats_for(contact_id)
            .await?
            .into_iter()
            .max_by(|a, b| a.updated_at.cmp(&b.updated_at));
        match latest {
            Some(chat) => Ok(chat),
            None => self.create_chat_locked(contact_id, None).await,
        }
    }

    /// Resolve an id that may name a chat or, failing that, a contact whose
    /// chat should be opened.
    pub async fn resolve_chat(&self, id: &str) -> Result<Chat> {
        match self.get_chat(id).await {
            Ok(chat) => Ok(chat),
            Err(e) if e.is_not_found() => {
                if self.contact_exists(id).await? {
                    self.open_chat_for_contact(id).await
                } else {
                    Err(StoreError::not_found(RecordKind::Chat, id))
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Append one message; returns it as stored (timestamp may be clamped).
    pub async fn append_message(&self, chat_id: &str, message: Message) -> Result<Message> {
        if !is_safe_id(chat_id) {
            return Err(StoreError::not_found(RecordKind::Chat, chat_id));
        }
        let guard = self.locks.acquire(RecordKind::Chat, chat_id).await;
        let mut chat = match self.get_chat(chat_id).await {
            Ok(chat) => chat,
            Err(e) => {
                if e.is_not_found() {
                    self.locks.release_missing(guard, RecordKind::Chat, chat_id);
                }
                return Err(e);
            }
        };
        let stored = chat.push(message)?;
        records::write(&record_path(&self.chats_dir(), chat_id), &chat).await?;
        Ok(stored)
    }

    pub async fn delete_chat(&self, id: &str) -> Result<()> {
        if !is_safe_id(id) || !self.remove_chat_record(id).await? {
            return Err(StoreError::not_found(RecordKind::Chat, id));
        }
        tracing::debug!(id, "chat deleted");
        Ok(())
    }

    pub(crate) async fn remove_chat_record(&self, id: &str) -> Result<bool> {
        let guard = self.locks.acquire(RecordKind::Chat, id).await;
        let removed = records::remove(&record_path(&self.chats_dir(), id)).await?;
        // gone either way
        self.locks.release_missing(guard, RecordKind::Chat, id);
        Ok(removed)
    }
}

fn sort_chats(chats: &mut [Chat]) {
    chats.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
