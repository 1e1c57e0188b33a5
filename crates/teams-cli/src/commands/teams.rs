//! `teams teams list` and `teams teams channels <teamId>`

use super::{CommandOutput, TeamChannels};
use crate::console::RenderContext;
use crate::progress::with_spinner;
use teams_core::auth::ScopeTokenProvider;
use teams_core::client::TeamsClient;
use teams_core::error::{TeamsError, TeamsResult};
use teams_core::types::TeamsExport;

const UNKNOWN_TEAM_NAME: &str = "Unknown team";

pub async fn run_list<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    let me = with_spinner(context, "Fetching teams list...", client.users().me().fetch()).await?;
    Ok(CommandOutput::TeamsList(me.teams))
}

pub async fn run_channels<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
    team_id: &str,
) -> TeamsResult<CommandOutput> {
    let me = with_spinner(
        context,
        "Fetching team channels...",
        client.users().me().fetch(),
    )
    .await?;
    team_channels(&me, team_id.trim()).map(CommandOutput::Channels)
}

pub fn team_channels(me: &TeamsExport, team_id: &str) -> TeamsResult<TeamChannels> {
    let team = me
        .find_team(team_id)
        .ok_or_else(|| TeamsError::not_found_resource(format!("team {}", team_id), "team"))?;

    let team_name = if team.display_name.trim().is_empty() {
        UNKNOWN_TEAM_NAME.to_string()
    } else {
        team.display_name.clone()
    };
    Ok(TeamChannels {
        team_id: team_id.to_string(),
        team_name,
        channels: team.channels.clone(),
    })
}
