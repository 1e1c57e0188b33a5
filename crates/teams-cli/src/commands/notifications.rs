//! `teams notifications`

use super::CommandOutput;
use crate::console::RenderContext;
use crate::progress::with_spinner;
use teams_core::auth::ScopeTokenProvider;
use teams_core::client::TeamsClient;
use teams_core::error::TeamsResult;
use teams_core::rest::ConversationMessagesOptions;

pub async fn run<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
    limit: u32,
) -> TeamsResult<CommandOutput> {
    let options = ConversationMessagesOptions::default().with_page_size(limit);
    let feed = with_spinner(
        context,
        "Fetching notifications...",
        client.notifications().fetch_messages(&options),
    )
    .await?;
    Ok(CommandOutput::Notifications(feed))
}
