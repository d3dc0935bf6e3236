//! Chatmate CLI
//!
//! Talks to a running chatmate-server through the shell's client.

use anyhow::Result;
use chatmate_core::{ChatSummary, Contact, ContactPatch, Message, NewContact, Personality};
use chatmate_shell::{ChatmateClient, Page, Route};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chatmate")]
#[command(about = "Chat with AI contacts from the terminal")]
#[command(version)]
struct Cli {
    /// Server base URL
    #[arg(short, long, global = true, default_value = "http://localhost:3001")]
    server: String,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage chats
    Chats {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Send a message to a chat (or to a contact's latest chat)
    Send {
        /// Chat id or contact id
        id: String,

        /// Message text
        text: String,
    },

    /// One-off reply without storing anything
    Ask {
        message: String,

        #[arg(short, long, default_value = "friendly")]
        personality: String,
    },

    /// Show server health and key status
    Health,

    /// Resolve a client path and show what its page would load
    Route {
        /// Path such as /contacts or /chat/<id>
        path: String,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts
    List,

    /// Create a contact
    Add {
        name: String,

        /// friendly, professional, funny, romantic, supportive, wise, sarcastic
        #[arg(short, long, default_value = "friendly")]
        personality: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Path under /uploads
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Show one contact
    Show { id: String },

    /// Change a contact
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        personality: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },

    /// Delete a contact and its chats
    Rm { id: String },
}

#[derive(Subcommand)]
enum ChatCommands {
    /// List chats, optionally for one contact
    List {
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Start a chat with a contact
    New {
        contact: String,

        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print a chat thread
    Show { id: String },

    /// Delete a chat
    Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatmate_shell=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = ChatmateClient::new(&cli.server);
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Contacts { command } => cmd_contacts(&client, &out, command).await,
        Commands::Chats { command } => cmd_chats(&client, &out, command).await,
        Commands::Send { id, text } => {
            let turn = client.send_message(&id, &text).await?;
            if out.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "reply": turn.reply,
                        "source": turn.source,
                        "chatId": turn.chat_id,
                        "userMessage": turn.user_message,
                        "assistantMessage": turn.assistant_message,
                    }))?
                );
            } else {
                println!("[{}] {}", turn.source, turn.reply);
                println!("  chat: {}", turn.chat_id);
            }
            Ok(())
        }
        Commands::Ask { message, personality } => {
            let reply = client
                .one_shot(&message, &Personality::parse(&personality), &[])
                .await?;
            println!("[{}] {}", reply.source, reply.reply);
            Ok(())
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{} - {}", health.status, health.message);
            println!("  gemini key:  {}", if health.has_gemini_key { "valid" } else { "not configured" });
            println!("  key length:  {}", health.api_key_length);
            println!("  key format:  {}", health.key_format);
            println!("  encryption:  {}", health.encryption_status);
            Ok(())
        }
        Commands::Route { path } => cmd_route(&client, &out, &path).await,
    }
}

struct Output {
    json: bool,
}

impl Output {
    fn value<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn contact(&self, c: &Contact) -> Result<()> {
        if self.json {
            return self.value(c);
        }
        println!("{}  {} ({})", c.id, c.name, c.personality);
        if let Some(desc) = &c.description {
            println!("    {desc}");
        }
        Ok(())
    }

    fn contacts(&self, contacts: &[Contact]) -> Result<()> {
        if self.json {
            return self.value(&contacts);
        }
        if contacts.is_empty() {
            println!("No contacts yet. Add one with: chatmate contacts add <name>");
        }
        for c in contacts {
            self.contact(c)?;
        }
        Ok(())
    }

    fn chats(&self, chats: &[ChatSummary]) -> Result<()> {
        if self.json {
            return self.value(&chats);
        }
        if chats.is_empty() {
            println!("No chats.");
        }
        for chat in chats {
            let last = chat
                .last_message
                .as_ref()
                .map(|m| m.content.as_str())
                .unwrap_or("");
            println!("{}  {} [{} messages] {}", chat.id, chat.title, chat.message_count, last);
        }
        Ok(())
    }

    fn thread(&self, title: &str, messages: &[Message]) -> Result<()> {
        if self.json {
            return self.value(&messages);
        }
        println!("== {title} ==");
        for m in messages {
            println!("{} {:>9}: {}", m.timestamp.format("%H:%M"), m.role.to_string(), m.content);
        }
        Ok(())
    }
}

async fn cmd_contacts(client: &ChatmateClient, out: &Output, command: ContactCommands) -> Result<()> {
    match command {
        ContactCommands::List => out.contacts(&client.list_contacts().await?),
        ContactCommands::Add {
            name,
            personality,
            description,
            avatar,
        } => {
            let input = NewContact {
                name: Some(name),
                personality: Some(personality),
                avatar,
                description,
            };
            out.contact(&client.create_contact(&input).await?)
        }
        ContactCommands::Show { id } => out.contact(&client.get_contact(&id).await?),
        ContactCommands::Update {
            id,
            name,
            personality,
            description,
            avatar,
        } => {
            let patch = ContactPatch {
                name,
                personality,
                avatar,
                description,
            };
            out.contact(&client.update_contact(&id, &patch).await?)
        }
        ContactCommands::Rm { id } => {
            let deleted = client.delete_contact(&id).await?;
            println!("Deleted {} and {} chat(s)", deleted.id, deleted.chats_deleted.unwrap_or(0));
            Ok(())
        }
    }
}

async fn cmd_chats(client: &ChatmateClient, out: &Output, command: ChatCommands) -> Result<()> {
    match command {
        ChatCommands::List { contact } => out.chats(&client.list_chats(contact.as_deref()).await?),
        ChatCommands::New { contact, title } => {
            let chat = client.create_chat(&contact, title.as_deref()).await?;
            if out.json {
                return out.value(&chat);
            }
            println!("{}  {}", chat.id, chat.title);
            Ok(())
        }
        ChatCommands::Show { id } => {
            let chat = client.get_chat(&id).await?;
            out.thread(&chat.title, &chat.messages)
        }
        ChatCommands::Rm { id } => {
            let deleted = client.delete_chat(&id).await?;
            println!("Deleted {}", deleted.id);
            Ok(())
        }
    }
}

async fn cmd_route(client: &ChatmateClient, out: &Output, path: &str) -> Result<()> {
    let route = Route::parse(path);
    println!("{} -> {}", path, route);

    match Page::load(client, &route).await? {
        Page::Contacts(contacts) => out.contacts(&contacts),
        Page::Setup => {
            println!("Setup form: name, personality, optional avatar");
            Ok(())
        }
        Page::ChatList { contact, chats } => {
            out.contact(&contact)?;
            out.chats(&chats)
        }
        Page::Chat { contact, chat } => out.thread(&format!("{} with {}", chat.title, contact.name), &chat.messages),
        Page::LegacyChat => {
            println!("Legacy chat: replies come from `chatmate ask`; nothing is stored on the server");
            Ok(())
        }
        Page::Test(health) => {
            println!("API {}: {} (key {})", health.status, health.message, health.key_format);
            Ok(())
        }
        Page::NotFound(path) => {
            println!("No page at {path}");
            Ok(())
        }
    }
}
