//! Chat service conversation messages

use crate::auth::ScopeTokenProvider;
use crate::error::TeamsResult;
use crate::rest::{RequestOptions, RestClient, SCOPES};
use crate::types::ConversationMessagesResponse;

/// Default message view of the chat service
pub const DEFAULT_MESSAGE_VIEW: &str = "msnp24Equivalent|supportsMessageProperties";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMessagesOptions {
    pub view: String,
    pub page_size: u32,
    pub start_time: i64,
    pub sync_state: Option<String>,
    pub end_time: Option<i64>,
    pub draft_version: Option<String>,
}

impl Default for ConversationMessagesOptions {
    fn default() -> Self {
        Self {
            view: DEFAULT_MESSAGE_VIEW.to_string(),
            page_size: 200,
            start_time: 1,
            sync_state: None,
            end_time: None,
            draft_version: None,
        }
    }
}

impl ConversationMessagesOptions {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn to_request_options(&self) -> RequestOptions {
        let mut options = RequestOptions::default()
            .with_query("view", &self.view)
            .with_query("pageSize", self.page_size)
            .with_query("startTime", self.start_time);
        if let Some(sync_state) = self.sync_state.as_deref().filter(|s| !s.is_empty()) {
            options = options.with_query("syncState", sync_state);
        }
        if let Some(end_time) = self.end_time {
            options = options.with_query("endTime", end_time);
        }
        if let Some(draft_version) = self.draft_version.as_deref().filter(|s| !s.is_empty()) {
            options = options.with_query("draftVersion", draft_version);
        }
        options
    }
}

/// `GET /api/chatsvc/jp/v1/users/ME/conversations/{id}/messages`
pub async fn fetch_conversation_messages<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
    conversation_id: &str,
    options: &ConversationMessagesOptions,
) -> TeamsResult<ConversationMessagesResponse> {
    let url = rest.endpoints().url(&format!(
        "/api/chatsvc/jp/v1/users/ME/conversations/{}/messages",
        urlencoding::encode(conversation_id)
    ));
    rest.get(&url, SCOPES.chats, options.to_request_options())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::TeamsEndpoints;
    use crate::rest::client::test_support::RecordingTokens;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_optional_query_pairs() {
        let options = ConversationMessagesOptions {
            sync_state: Some(String::new()),
            end_time: Some(0),
            draft_version: Some("v2".to_string()),
            ..Default::default()
        }
        .to_request_options();
        let keys: Vec<_> = options.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["view", "pageSize", "startTime", "endTime", "draftVersion"]
        );
    }

    #[tokio::test]
    async fn test_fetch_encodes_conversation_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/api/chatsvc/jp/v1/users/ME/conversations/48%3Anotifications/messages",
            ))
            .and(query_param("view", DEFAULT_MESSAGE_VIEW))
            .and(query_param("pageSize", "5"))
            .and(query_param("startTime", "1"))
            .and(query_param_is_missing("syncState"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"id": "1", "content": "hi"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut rest = RestClient::new(RecordingTokens::default())
            .with_endpoints(TeamsEndpoints::default().with_api_base(server.uri()));
        let response = fetch_conversation_messages(
            &mut rest,
            "48:notifications",
            &ConversationMessagesOptions::default().with_page_size(5),
        )
        .await
        .unwrap();

        assert_eq!(response.messages.len(), 1);
        assert_eq!(rest.token_provider().scopes, vec![SCOPES.chats]);
    }
}
