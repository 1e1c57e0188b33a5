//! One function per service route

pub mod channels;
pub mod conversations;
pub mod users;

pub use channels::{
    ChannelQueryOptions, fetch_channel, fetch_channel_messages, flatten_channel_messages,
};
pub use conversations::{ConversationMessagesOptions, fetch_conversation_messages};
pub use users::{
    FetchShortProfileOptions, fetch_current_user, fetch_pinned_channels, fetch_short_profile,
};
