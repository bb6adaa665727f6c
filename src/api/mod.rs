//! # API Module
//!
//! HTTP endpoint served by the local callback server during `sparcli auth`.
//!
//! - [`callback`] - receives the authorization code from Spotify's
//!   authorization server and exchanges it, together with the PKCE code
//!   verifier, for the user token that backs all write operations.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sparcli::api::callback;
//!
//! let app = Router::new().route("/callback", get(callback));
//! ```

mod callback;

pub use callback::callback;
