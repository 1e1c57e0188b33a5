//! Typed payloads of the Teams service routes
//!
//! Only the fields the client reads are typed. Everything else is kept in a
//! flattened `extra` map so serializing a payload back out loses nothing.

mod channel;
mod conversation;
mod user;

pub use channel::{ChannelPostMessage, ChannelPostsResponse, ChannelReplyChain};
pub use conversation::{
    ConversationActivity, ConversationMessage, ConversationMessageProperties,
    ConversationMessagesMetadata, ConversationMessagesResponse,
};
pub use user::{
    Channel, ChatThread, FetchShortProfileResponse, LastMessage, PinnedChannelsResponse,
    PrivateFeed, ShortProfileUser, SyncMetadata, Team, TeamsExport,
};

/// Unmodelled fields of a payload
pub type Extra = serde_json::Map<String, serde_json::Value>;
