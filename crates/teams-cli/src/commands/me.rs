//! `teams me`

use super::CommandOutput;
use crate::console::RenderContext;
use crate::progress::with_spinner;
use teams_core::auth::ScopeTokenProvider;
use teams_core::client::TeamsClient;
use teams_core::error::TeamsResult;

pub async fn run<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    let me = with_spinner(context, "Fetching current user...", client.users().me().fetch()).await?;
    Ok(CommandOutput::Me(me))
}
