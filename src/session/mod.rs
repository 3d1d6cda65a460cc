//! Auth session handling.
//!
//! # Data Flow
//! ```text
//! Cookie header
//!     → store.rs (Session extractor: read access_token)
//!     → handler (may set or clear tokens)
//!     → Set-Cookie headers on the response
//! ```
//!
//! # Design Decisions
//! - No server-side session table; the browser owns the tokens
//! - A Session lives for one request and is passed explicitly, never global
//! - Cookies are HttpOnly + SameSite=Lax, Secure in production

pub mod store;

pub use store::{CookiePolicy, Session, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
