//! `teams channel messages <channelId>`

use super::CommandOutput;
use crate::console::RenderContext;
use crate::progress::with_spinner;
use teams_core::auth::ScopeTokenProvider;
use teams_core::client::TeamsClient;
use teams_core::error::{TeamsError, TeamsResult};
use teams_core::rest::ChannelQueryOptions;
use teams_core::types::TeamsExport;

pub async fn run_messages<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
    channel_id: &str,
    limit: u32,
) -> TeamsResult<CommandOutput> {
    let channel_id = channel_id.trim();
    if channel_id.is_empty() {
        return Err(TeamsError::invalid_input(
            "Usage: teams channel messages <channelId> [--limit <n>]",
        ));
    }

    let label = format!("Fetching messages for channel={}...", channel_id);
    let messages = with_spinner(context, &label, async {
        let me = client.users().me().fetch().await?;
        let team_id = resolve_owning_team(&me, channel_id)?;
        client
            .channels()
            .fetch_messages(&team_id, channel_id, ChannelQueryOptions { page_size: limit })
            .await
    })
    .await?;
    Ok(CommandOutput::ChannelMessages(messages))
}

/// The one team whose channel list contains `channel_id`
pub fn resolve_owning_team(me: &TeamsExport, channel_id: &str) -> TeamsResult<String> {
    match me.team_ids_for_channel(channel_id).as_slice() {
        [] => Err(TeamsError::not_found_resource(
            format!("channel {}", channel_id),
            "channel",
        )),
        [team_id] => Ok((*team_id).to_string()),
        _ => Err(TeamsError::invalid_input(format!(
            "Ambiguous channel: {} exists in multiple teams",
            channel_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> TeamsExport {
        serde_json::from_value(json!({
            "teams": [
                {"id": "t1", "displayName": "One", "channels": [{"id": "c1"}, {"id": "shared"}]},
                {"id": "t2", "displayName": "Two", "channels": [{"id": "c2"}, {"id": "shared"}]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_single_owner() {
        assert_eq!(resolve_owning_team(&snapshot(), "c2").unwrap(), "t2");
    }

    #[test]
    fn test_unknown_channel() {
        let err = resolve_owning_team(&snapshot(), "missing").unwrap_err();
        assert!(matches!(err, TeamsError::NotFound { .. }));
        assert_eq!(err.to_string(), "Not found: channel missing");
    }

    #[test]
    fn test_ambiguous_channel() {
        let err = resolve_owning_team(&snapshot(), "shared").unwrap_err();
        assert!(matches!(err, TeamsError::InvalidInput { .. }));
        assert!(err.to_string().contains("Ambiguous channel"));
    }
}
