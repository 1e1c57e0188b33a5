//! Channel posts

use crate::auth::ScopeTokenProvider;
use crate::error::TeamsResult;
use crate::rest::{RequestOptions, RestClient, SCOPES};
use crate::types::{ChannelPostMessage, ChannelPostsResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelQueryOptions {
    pub page_size: u32,
}

impl Default for ChannelQueryOptions {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

/// `GET /api/csa/apac/api/v1/teams/{teamId}/channels/{channelId}`
pub async fn fetch_channel<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
    team_id: &str,
    channel_id: &str,
    options: ChannelQueryOptions,
) -> TeamsResult<ChannelPostsResponse> {
    let url = rest.endpoints().url(&format!(
        "/api/csa/apac/api/v1/teams/{}/channels/{}",
        urlencoding::encode(team_id),
        urlencoding::encode(channel_id)
    ));
    rest.get(
        &url,
        SCOPES.channels,
        RequestOptions::default().with_query("pageSize", options.page_size),
    )
    .await
}

/// Every message of every reply chain, in chain order
pub fn flatten_channel_messages(posts: ChannelPostsResponse) -> Vec<ChannelPostMessage> {
    posts
        .reply_chains
        .into_iter()
        .flat_map(|chain| chain.into_messages())
        .collect()
}

pub async fn fetch_channel_messages<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
    team_id: &str,
    channel_id: &str,
    options: ChannelQueryOptions,
) -> TeamsResult<Vec<ChannelPostMessage>> {
    let posts = fetch_channel(rest, team_id, channel_id, options).await?;
    Ok(flatten_channel_messages(posts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::TeamsEndpoints;
    use crate::rest::client::test_support::RecordingTokens;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_channel_messages_flattens_chains() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/api/csa/apac/api/v1/teams/19%3Ateam%40thread/channels/19%3Achan%40thread",
            ))
            .and(query_param("pageSize", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "replyChains": [
                    {"containerId": "c", "id": "1", "messages": [{"id": "a"}, {"id": "b"}]},
                    {"containerId": "c", "id": "2", "replies": [{"id": "c"}]},
                    {"containerId": "c", "id": "3", "message": {"id": "d"}},
                    {"containerId": "c", "id": "4"}
                ],
                "hasMore": false,
                "lastModifiedTimeOfLastReturnedReplyChain": null,
                "channelTenantId": "t"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut rest = RestClient::new(RecordingTokens::default())
            .with_endpoints(TeamsEndpoints::default().with_api_base(server.uri()));
        let messages = fetch_channel_messages(
            &mut rest,
            "19:team@thread",
            "19:chan@thread",
            ChannelQueryOptions::default(),
        )
        .await
        .unwrap();

        let ids: Vec<_> = messages.iter().filter_map(|m| m.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(rest.token_provider().scopes, vec![SCOPES.channels]);
    }
}
