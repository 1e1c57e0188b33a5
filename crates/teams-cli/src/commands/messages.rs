//! `teams messages <conversationId>`

use super::CommandOutput;
use crate::console::RenderContext;
use crate::progress::with_spinner;
use teams_core::auth::ScopeTokenProvider;
use teams_core::client::TeamsClient;
use teams_core::error::{TeamsError, TeamsResult};
use teams_core::rest::ConversationMessagesOptions;

pub async fn run<P: ScopeTokenProvider>(
    client: &mut TeamsClient<P>,
    context: &RenderContext,
    conversation_id: &str,
    limit: u32,
) -> TeamsResult<CommandOutput> {
    let conversation_id = conversation_id.trim();
    if conversation_id.is_empty() {
        return Err(TeamsError::invalid_input(
            "Usage: teams messages <conversationId> [--limit <n>]",
        ));
    }

    let options = ConversationMessagesOptions::default().with_page_size(limit);
    let label = format!("Fetching conversation {}...", conversation_id);
    let messages = with_spinner(
        context,
        &label,
        client
            .conversations()
            .fetch_messages(conversation_id, &options),
    )
    .await?;
    Ok(CommandOutput::Messages(messages))
}
