//! Route -> the data its page renders

use chatmate_core::{Chat, ChatSummary, Contact};

use crate::client::{ChatmateClient, Health};
use crate::route::Route;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Contacts(Vec<Contact>),
    /// Setup is a form; it needs nothing from the server
    Setup,
    ChatList {
        contact: Contact,
        chats: Vec<ChatSummary>,
    },
    Chat {
        contact: Contact,
        chat: Chat,
    },
    /// Served statelessly by `/api/chat`; local history stays on the client
    LegacyChat,
    Test(Health),
    NotFound(String),
}

impl Page {
    pub async fn load(client: &ChatmateClient, route: &Route) -> Result<Self> {
        let page = match route {
            Route::Contacts => Self::Contacts(client.list_contacts().await?),
            Route::Setup => Self::Setup,
            Route::ChatList { contact_id } => {
                let contact = client.get_contact(contact_id).await?;
                let chats = client.contact_chats(contact_id).await?;
                Self::ChatList { contact, chats }
            }
            Route::Chat { chat_id } => {
                let chat = client.get_chat(chat_id).await?;
                let contact = client.get_contact(&chat.contact_id).await?;
                Self::Chat { contact, chat }
            }
            Route::LegacyChat => Self::LegacyChat,
            Route::Test => Self::Test(client.health().await?),
            Route::NotFound(path) => Self::NotFound(path.clone()),
        };
        tracing::debug!(%route, "page loaded");
        Ok(page)
    }
}
