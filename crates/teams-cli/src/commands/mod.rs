//! Command handlers
//!
//! Each handler fetches through a [`TeamsClient`](teams_core::TeamsClient) and
//! returns a [`CommandOutput`] for the output layer to render.

pub mod channel;
pub mod login;
pub mod me;
pub mod messages;
pub mod notifications;
pub mod teams;

use serde::Serialize;
use serde_json::Value;
use teams_core::error::TeamsResult;
use teams_core::types::{
    Channel, ChannelPostMessage, ConversationMessagesResponse, Team, TeamsExport,
};

/// Channels of one team, as printed by `teams channels`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamChannels {
    pub team_id: String,
    pub team_name: String,
    pub channels: Vec<Channel>,
}

/// Where `login` stored the credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSummary {
    pub profile: String,
    pub profile_path: String,
}

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Notifications(ConversationMessagesResponse),
    Messages(ConversationMessagesResponse),
    ChannelMessages(Vec<ChannelPostMessage>),
    TeamsList(Vec<Team>),
    Channels(TeamChannels),
    Me(TeamsExport),
    Login(LoginSummary),
}

impl CommandOutput {
    /// Name reported in the machine-readable `command` field
    pub fn command_name(&self) -> &'static str {
        match self {
            CommandOutput::Notifications(_) => "notifications",
            CommandOutput::Messages(_) => "messages",
            CommandOutput::ChannelMessages(_) => "channel-messages",
            CommandOutput::TeamsList(_) => "list",
            CommandOutput::Channels(_) => "channels",
            CommandOutput::Me(_) => "me",
            CommandOutput::Login(_) => "login",
        }
    }

    /// Payload reported in the machine-readable `data` field
    pub fn data(&self) -> TeamsResult<Value> {
        let value = match self {
            CommandOutput::Notifications(response) | CommandOutput::Messages(response) => {
                serde_json::to_value(response)?
            }
            CommandOutput::ChannelMessages(messages) => serde_json::to_value(messages)?,
            CommandOutput::TeamsList(teams) => serde_json::to_value(teams)?,
            CommandOutput::Channels(channels) => serde_json::to_value(channels)?,
            CommandOutput::Me(me) => serde_json::to_value(me)?,
            CommandOutput::Login(summary) => serde_json::to_value(summary)?,
        };
        Ok(value)
    }
}
