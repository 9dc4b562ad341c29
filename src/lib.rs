//! # NavHub (Personal Link Directory Backend)
//!
//! `navhub` serves a personal navigation page: categorized links, an admin
//! panel, an optional "hidden links" view and a private bookmarks page.
//!
//! ## Access Tiers
//!
//! Three independent credential tiers share one token registry:
//!
//! - **admin** — username + password, unlocks all management endpoints.
//! - **hidden** — shared secret unlocking hidden links for a short window;
//!   falls back to the admin password when no dedicated secret is set.
//! - **bookmark** — independent shared secret for the private bookmarks page;
//!   only enforced while bookmarks are marked private.
//!
//! Tokens are opaque random strings held in memory only; a process restart
//! invalidates every session. Login-style endpoints share a per-IP lockout
//! (5 failures lock the source address out for 15 minutes), and all other
//! state-changing requests must pass a same-origin check.

pub mod api;
pub mod cli;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
