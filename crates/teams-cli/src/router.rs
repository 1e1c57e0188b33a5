//! Command routing

use crate::args::{ChannelAction, Cli, Commands, TeamsAction};
use crate::commands::{self, CommandOutput};
use crate::console::RenderContext;
use crate::output;
use crate::session;
use teams_core::auth::TokenManager;
use teams_core::client::TeamsClient;
use teams_core::config::{CredentialResolver, ProfileStore};
use teams_core::error::{TeamsError, TeamsResult};
use tracing::debug;

/// Run `command` and print its result
pub async fn route(cli: &Cli, command: &Commands, context: &RenderContext) -> TeamsResult<()> {
    let store = ProfileStore::resolve(&cli.profile, cli.profile_json.as_deref())?;
    debug!("Using profile {} at {}", store.label(), store.path().display());

    let result = match command {
        Commands::Login => commands::login::run(cli.overrides(), &store, context).await?,
        api_command => run_api_command(cli, api_command, &store, context).await?,
    };
    output::print_result(context, &result, store.label())
}

/// Resolve credentials, run the command, then persist the rotated refresh token
async fn run_api_command(
    cli: &Cli,
    command: &Commands,
    store: &ProfileStore,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    let mut profile = store.load();
    let credentials = CredentialResolver::new(cli.overrides()).resolve(&profile, store.path());
    let session::Session {
        mut client,
        session_cookie,
    } = session::open(&credentials, context).await?;

    let result = dispatch(command, &mut client, context).await?;

    let manager = client.into_token_provider();
    session::write_back(&mut profile, &manager, session_cookie.as_deref());
    store.save(&profile)?;
    Ok(result)
}

async fn dispatch(
    command: &Commands,
    client: &mut TeamsClient<TokenManager>,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    match command {
        Commands::Notifications { limit } => {
            commands::notifications::run(client, context, limit.limit).await
        }
        Commands::Messages {
            conversation_id,
            limit,
        } => commands::messages::run(client, context, conversation_id, limit.limit).await,
        Commands::Channel {
            action: ChannelAction::Messages { channel_id, limit },
        } => commands::channel::run_messages(client, context, channel_id, limit.limit).await,
        Commands::Teams {
            action: TeamsAction::List,
        } => commands::teams::run_list(client, context).await,
        Commands::Teams {
            action: TeamsAction::Channels { team_id },
        } => commands::teams::run_channels(client, context, team_id).await,
        Commands::Me => commands::me::run(client, context).await,
        Commands::Login => Err(TeamsError::invalid_input(
            "login runs without an API session",
        )),
    }
}
