//! Chat service conversation messages

use super::Extra;
use serde::{Deserialize, Serialize};

/// `GET .../conversations/{id}/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessagesResponse {
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(
        rename = "_metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<ConversationMessagesMetadata>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessagesMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_complete_segment_start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_complete_segment_end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_state: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A single chat message. The service spells most keys in lowercase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "conversationid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<String>,
    #[serde(
        rename = "clientmessageid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_message_id: Option<String>,
    #[serde(rename = "messagetype", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(
        rename = "imdisplayname",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub im_display_name: Option<String>,
    #[serde(rename = "composetime", default, skip_serializing_if = "Option::is_none")]
    pub compose_time: Option<String>,
    #[serde(
        rename = "originalarrivaltime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_arrival_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ConversationMessageProperties>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ConversationMessage {
    /// The activity block carried by notification-feed messages
    pub fn activity(&self) -> Option<&ConversationActivity> {
        self.properties.as_ref()?.activity.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessageProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<ConversationActivity>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Activity-feed entry (mentions, replies, reactions)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_user_im_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_thread_topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_preview: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
