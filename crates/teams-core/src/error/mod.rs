//! Error types for the Teams client
//!
//! Every failure surfaced by the auth core, the REST layer and the profile
//! collaborators is a [`TeamsError`]. Variants carry enough context for the
//! CLI to print a useful message and for callers to branch on
//! [`TeamsError::error_code`].

mod classifiers;
mod constructors;
mod conversions;
mod types;

pub use types::{TeamsError, TeamsResult};
