//! In-memory repositories for messages and prompt templates.

pub mod messages;
pub mod templates;
pub mod traits;

pub use messages::MessageStore;
pub use templates::TemplateStore;
pub use traits::{MessageRepository, TemplateRepository};
