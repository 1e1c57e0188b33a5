//! From trait implementations for TeamsError conversions

use super::types::TeamsError;

impl From<std::io::Error> for TeamsError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for TeamsError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<reqwest::Error> for TeamsError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}

impl From<url::ParseError> for TeamsError {
    fn from(error: url::ParseError) -> Self {
        Self::protocol(format!("invalid URL: {}", error))
    }
}
