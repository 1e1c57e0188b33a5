//! Error classification methods

use super::types::TeamsError;

impl TeamsError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TeamsError::InvalidParameter { .. } => "TEAMS_INVALID_PARAMETER",
            TeamsError::InvalidCredential { .. } => "TEAMS_INVALID_CREDENTIAL",
            TeamsError::SilentAuthFailed { .. } => "TEAMS_SILENT_AUTH_FAILED",
            TeamsError::Protocol { .. } => "TEAMS_PROTOCOL",
            TeamsError::TokenRefreshFailed { .. } => "TEAMS_TOKEN_REFRESH_FAILED",
            TeamsError::Http { .. } => "TEAMS_HTTP",
            TeamsError::Json { .. } => "TEAMS_JSON",
            TeamsError::Io { .. } => "TEAMS_IO",
            TeamsError::Config { .. } => "TEAMS_CONFIG",
            TeamsError::InvalidInput { .. } => "TEAMS_INVALID_INPUT",
            TeamsError::NotFound { .. } => "TEAMS_NOT_FOUND",
        }
    }

    /// Whether the user has to obtain a fresh session cookie to continue
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            TeamsError::InvalidCredential { .. } | TeamsError::SilentAuthFailed { .. } => true,
            TeamsError::TokenRefreshFailed { oauth_error, .. } => {
                oauth_error.as_deref() == Some("invalid_grant")
            }
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TeamsError::SilentAuthFailed { status } => Some(*status),
            TeamsError::TokenRefreshFailed { status, .. } => Some(*status),
            TeamsError::Http { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_token_refresh_failed_display() {
        let err = TeamsError::token_refresh_failed(StatusCode::BAD_REQUEST, None);
        assert_eq!(err.to_string(), "Failed to refresh token: 400 Bad Request");
        assert_eq!(err.status_code(), Some(400));
    }

    #[test]
    fn test_requires_reauthentication() {
        assert!(TeamsError::silent_auth_failed(200).requires_reauthentication());
        assert!(TeamsError::invalid_credential("empty").requires_reauthentication());
        assert!(
            TeamsError::token_refresh_failed(
                StatusCode::BAD_REQUEST,
                Some("invalid_grant".to_string())
            )
            .requires_reauthentication()
        );
        assert!(
            !TeamsError::token_refresh_failed(StatusCode::INTERNAL_SERVER_ERROR, None)
                .requires_reauthentication()
        );
        assert!(!TeamsError::http("boom").requires_reauthentication());
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            TeamsError::invalid_parameter("x").error_code(),
            TeamsError::invalid_credential("x").error_code(),
            TeamsError::silent_auth_failed(200).error_code(),
            TeamsError::protocol("x").error_code(),
            TeamsError::http("x").error_code(),
            TeamsError::config("x").error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
