//! Reusable UI components

pub mod chat_input;
pub mod chat_message;
pub mod clause_card;
pub mod header;
pub mod loading;
pub mod metadata_card;
pub mod session_list;

pub use chat_input::ChatInput;
pub use chat_message::ChatBubble;
pub use clause_card::ClauseCard;
pub use header::Header;
pub use loading::{Progress, ReplyPending, Task};
pub use metadata_card::{ConfidenceBadge, MetadataCard};
pub use session_list::SessionList;
