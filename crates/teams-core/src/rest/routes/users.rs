//! Current user, pinned channels and short profiles

use crate::auth::ScopeTokenProvider;
use crate::error::TeamsResult;
use crate::rest::{RequestOptions, RestClient, SCOPES};
use crate::types::{
    FetchShortProfileResponse, PinnedChannelsResponse, ShortProfileUser, TeamsExport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchShortProfileOptions {
    pub is_mail_address: bool,
    pub skype_teams_info: bool,
    pub can_be_smtp_address: bool,
    pub include_ib_barred_users: bool,
    pub include_disabled_accounts: bool,
}

impl Default for FetchShortProfileOptions {
    fn default() -> Self {
        Self {
            is_mail_address: false,
            skype_teams_info: true,
            can_be_smtp_address: false,
            include_ib_barred_users: true,
            include_disabled_accounts: true,
        }
    }
}

/// `POST /api/mt/apac/beta/users/fetchShortProfile`
pub async fn fetch_short_profile<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
    mri_or_emails: &[String],
    options: FetchShortProfileOptions,
) -> TeamsResult<Vec<ShortProfileUser>> {
    let url = rest.endpoints().url("/api/mt/apac/beta/users/fetchShortProfile");
    let request = RequestOptions::default()
        .with_query("isMailAddress", options.is_mail_address)
        .with_query("enableGuest", true)
        .with_query("skypeTeamsInfo", options.skype_teams_info)
        .with_query("canBeSmtpAddress", options.can_be_smtp_address)
        .with_query("includeIBBarredUsers", options.include_ib_barred_users)
        .with_query("includeDisabledAccounts", options.include_disabled_accounts)
        .with_json_body(serde_json::to_value(mri_or_emails)?);

    let response: FetchShortProfileResponse = rest.post(&url, SCOPES.users, request).await?;
    Ok(response.value)
}

/// `GET /api/csa/apac/api/v3/teams/users/me`
pub async fn fetch_current_user<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
) -> TeamsResult<TeamsExport> {
    let url = rest.endpoints().url("/api/csa/apac/api/v3/teams/users/me");
    let request = RequestOptions::default()
        .with_query("isPrefetch", false)
        .with_query("enableMembershipSummary", true)
        .with_query("supportsAdditionalSystemGeneratedFolders", true)
        .with_query("supportsSliceItems", true)
        .with_query("enableEngageCommunities", false);
    rest.get(&url, SCOPES.channels, request).await
}

/// `GET /api/csa/apac/api/v1/teams/users/me/pinnedChannels`
pub async fn fetch_pinned_channels<P: ScopeTokenProvider>(
    rest: &mut RestClient<P>,
) -> TeamsResult<PinnedChannelsResponse> {
    let url = rest
        .endpoints()
        .url("/api/csa/apac/api/v1/teams/users/me/pinnedChannels");
    rest.get(&url, SCOPES.channels, RequestOptions::default())
        .await
}
