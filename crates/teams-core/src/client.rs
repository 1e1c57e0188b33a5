//! High-level client grouping the service routes

use crate::auth::ScopeTokenProvider;
use crate::error::TeamsResult;
use crate::rest::routes::{self, ChannelQueryOptions, ConversationMessagesOptions};
use crate::rest::{FetchShortProfileOptions, RestClient, TeamsEndpoints};
use crate::types::{
    ChannelPostMessage, ChannelPostsResponse, ConversationMessagesResponse, PinnedChannelsResponse,
    ShortProfileUser, TeamsExport,
};

/// Conversation id of the activity notification feed
pub const NOTIFICATIONS_CONVERSATION: &str = "48:notifications";
/// Conversation id of the mentions feed
pub const MENTIONS_CONVERSATION: &str = "48:mentions";
/// Conversation id of the saved-messages feed
pub const ANNOTATIONS_CONVERSATION: &str = "48:annotations";

/// Teams web API client.
///
/// Owns its token provider; take it back with
/// [`TeamsClient::into_token_provider`] to persist a rotated refresh token.
#[derive(Debug)]
pub struct TeamsClient<P> {
    rest: RestClient<P>,
}

impl<P: ScopeTokenProvider> TeamsClient<P> {
    pub fn new(token_provider: P) -> Self {
        Self {
            rest: RestClient::new(token_provider),
        }
    }

    /// Wrap a preconfigured transport
    pub fn from_rest(rest: RestClient<P>) -> Self {
        Self { rest }
    }

    pub fn with_http_client(self, client: reqwest::Client) -> Self {
        Self {
            rest: self.rest.with_http_client(client),
        }
    }

    pub fn with_endpoints(self, endpoints: TeamsEndpoints) -> Self {
        Self {
            rest: self.rest.with_endpoints(endpoints),
        }
    }

    pub fn rest(&mut self) -> &mut RestClient<P> {
        &mut self.rest
    }

    pub fn token_provider(&self) -> &P {
        self.rest.token_provider()
    }

    pub fn into_token_provider(self) -> P {
        self.rest.into_token_provider()
    }

    pub fn conversations(&mut self) -> ConversationsApi<'_, P> {
        ConversationsApi {
            rest: &mut self.rest,
        }
    }

    pub fn notifications(&mut self) -> NotificationsApi<'_, P> {
        NotificationsApi {
            rest: &mut self.rest,
        }
    }

    pub fn channels(&mut self) -> ChannelsApi<'_, P> {
        ChannelsApi {
            rest: &mut self.rest,
        }
    }

    pub fn users(&mut self) -> UsersApi<'_, P> {
        UsersApi {
            rest: &mut self.rest,
        }
    }
}

pub struct ConversationsApi<'a, P> {
    rest: &'a mut RestClient<P>,
}

impl<P: ScopeTokenProvider> ConversationsApi<'_, P> {
    pub async fn fetch_messages(
        self,
        conversation_id: &str,
        options: &ConversationMessagesOptions,
    ) -> TeamsResult<ConversationMessagesResponse> {
        routes::fetch_conversation_messages(self.rest, conversation_id, options).await
    }
}

/// The built-in activity feeds
pub struct NotificationsApi<'a, P> {
    rest: &'a mut RestClient<P>,
}

impl<P: ScopeTokenProvider> NotificationsApi<'_, P> {
    pub async fn fetch_messages(
        self,
        options: &ConversationMessagesOptions,
    ) -> TeamsResult<ConversationMessagesResponse> {
        routes::fetch_conversation_messages(self.rest, NOTIFICATIONS_CONVERSATION, options).await
    }

    pub async fn fetch_mentions(
        self,
        options: &ConversationMessagesOptions,
    ) -> TeamsResult<ConversationMessagesResponse> {
        routes::fetch_conversation_messages(self.rest, MENTIONS_CONVERSATION, options).await
    }

    pub async fn fetch_annotations(
        self,
        options: &ConversationMessagesOptions,
    ) -> TeamsResult<ConversationMessagesResponse> {
        routes::fetch_conversation_messages(self.rest, ANNOTATIONS_CONVERSATION, options).await
    }
}

pub struct ChannelsApi<'a, P> {
    rest: &'a mut RestClient<P>,
}

impl<P: ScopeTokenProvider> ChannelsApi<'_, P> {
    pub async fn fetch(
        self,
        team_id: &str,
        channel_id: &str,
        options: ChannelQueryOptions,
    ) -> TeamsResult<ChannelPostsResponse> {
        routes::fetch_channel(self.rest, team_id, channel_id, options).await
    }

    pub async fn fetch_messages(
        self,
        team_id: &str,
        channel_id: &str,
        options: ChannelQueryOptions,
    ) -> TeamsResult<Vec<ChannelPostMessage>> {
        routes::fetch_channel_messages(self.rest, team_id, channel_id, options).await
    }
}

pub struct UsersApi<'a, P> {
    rest: &'a mut RestClient<P>,
}

impl<'a, P: ScopeTokenProvider> UsersApi<'a, P> {
    pub async fn fetch_short_profile(
        self,
        mri_or_emails: &[String],
        options: FetchShortProfileOptions,
    ) -> TeamsResult<Vec<ShortProfileUser>> {
        routes::fetch_short_profile(self.rest, mri_or_emails, options).await
    }

    /// Routes scoped to the signed-in user
    pub fn me(self) -> MeApi<'a, P> {
        MeApi { rest: self.rest }
    }
}

pub struct MeApi<'a, P> {
    rest: &'a mut RestClient<P>,
}

impl<P: ScopeTokenProvider> MeApi<'_, P> {
    pub async fn fetch(self) -> TeamsResult<TeamsExport> {
        routes::fetch_current_user(self.rest).await
    }

    pub async fn fetch_pinned_channels(self) -> TeamsResult<PinnedChannelsResponse> {
        routes::fetch_pinned_channels(self.rest).await
    }
}
