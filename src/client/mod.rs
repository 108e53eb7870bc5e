//! Repository API client and authentication.
//!
//! This module provides the [`RepoClient`] for talking to a remote workflow
//! repository, along with authentication types ([`Auth`], [`AuthType`]).

mod auth;
mod repo;

pub use auth::{Auth, AuthType};
pub use repo::{DEFAULT_TIMEOUT, RepoClient, RequestError};
