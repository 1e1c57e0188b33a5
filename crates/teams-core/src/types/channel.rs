//! Channel reply chains

use super::Extra;
use serde::{Deserialize, Serialize};

/// `GET .../teams/{teamId}/channels/{channelId}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPostsResponse {
    #[serde(default)]
    pub reply_chains: Vec<ChannelReplyChain>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub last_modified_time_of_last_returned_reply_chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_tenant_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A root post with its replies. The service fills exactly one of
/// `messages`, `replies` or `message` depending on the view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReplyChain {
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_delivery_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChannelPostMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ChannelPostMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChannelPostMessage>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ChannelReplyChain {
    /// Messages of this chain: `messages`, else `replies`, else the single `message`
    pub fn into_messages(self) -> Vec<ChannelPostMessage> {
        match (self.messages, self.replies, self.message) {
            (Some(messages), _, _) => messages,
            (None, Some(replies), _) => replies,
            (None, None, Some(message)) => vec![message],
            (None, None, None) => Vec::new(),
        }
    }
}

/// A channel post or reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPostMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub im_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_display_name_in_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ChannelPostMessage {
    /// Best display name available for the sender
    pub fn sender_name(&self) -> Option<&str> {
        [
            self.im_display_name.as_deref(),
            self.from_display_name_in_token.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: &str) -> ChannelPostMessage {
        ChannelPostMessage {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_chain_message_precedence() {
        let chain = ChannelReplyChain {
            messages: Some(vec![post("m1"), post("m2")]),
            replies: Some(vec![post("r1")]),
            message: Some(post("single")),
            ..Default::default()
        };
        let ids: Vec<_> = chain.into_messages().into_iter().filter_map(|m| m.id).collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        let chain = ChannelReplyChain {
            replies: Some(vec![post("r1")]),
            message: Some(post("single")),
            ..Default::default()
        };
        assert_eq!(chain.into_messages()[0].id.as_deref(), Some("r1"));

        let chain = ChannelReplyChain {
            message: Some(post("single")),
            ..Default::default()
        };
        assert_eq!(chain.into_messages()[0].id.as_deref(), Some("single"));

        assert!(ChannelReplyChain::default().into_messages().is_empty());
    }

    #[test]
    fn test_empty_messages_array_wins_over_replies() {
        let chain = ChannelReplyChain {
            messages: Some(Vec::new()),
            replies: Some(vec![post("r1")]),
            ..Default::default()
        };
        assert!(chain.into_messages().is_empty());
    }

    #[test]
    fn test_sender_name_fallback() {
        let message: ChannelPostMessage = serde_json::from_value(json!({
            "imDisplayName": " ",
            "fromDisplayNameInToken": "Grace"
        }))
        .unwrap();
        assert_eq!(message.sender_name(), Some("Grace"));

        let message: ChannelPostMessage = serde_json::from_value(json!({
            "fromDisplayNameInToken": "Grace",
            "sequenceId": 3
        }))
        .unwrap();
        assert_eq!(message.sender_name(), Some("Grace"));
        assert_eq!(message.extra.get("sequenceId"), Some(&json!(3)));
    }
}
