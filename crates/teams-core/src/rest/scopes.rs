//! Service base URL, worker referrer and per-service OAuth scopes

/// Base URL of the Teams web API
pub const TEAMS_API_BASE: &str = "https://teams.cloud.microsoft";

/// Referrer presented by the Teams web worker
pub const TEAMS_WORKER_REFERRER: &str =
    "https://teams.cloud.microsoft/v2/worker/precompiled-web-worker-8e61d59c0abedf86.js";

/// OAuth scope strings, one per backend service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceScopes {
    /// Chat service (conversation messages, notification feeds)
    pub chats: &'static str,
    /// Chat aggregation service (teams, channels, current user)
    pub channels: &'static str,
    /// Middle tier (user profiles)
    pub users: &'static str,
}

pub const SCOPES: ServiceScopes = ServiceScopes {
    chats: "https://ic3.teams.office.com/.default openid profile offline_access",
    channels: "https://chatsvcagg.teams.microsoft.com/.default openid profile offline_access",
    users: "https://api.spaces.skype.com/.default openid profile offline_access",
};
