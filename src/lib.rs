// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API
//!
//! Backend for a portfolio site: project and skill CRUD over a document
//! store, plus a contact form guarded by an anti-abuse gate:
//!
//! - required field, CAPTCHA, and honeypot checks
//! - per-client submission throttling (30 s window, hourly sweep)
//! - fill-time heuristic
//! - content heuristics (URLs, spam keywords, repeated characters,
//!   markup, all-caps runs)
//! - length bounds and minimum word count

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod models;
pub mod routes;

pub use config::Config;
pub use db::Database;
pub use error::{AppError, Result};
pub use gate::{Rejection, SubmissionGate};
pub use limiter::{SubmissionThrottle, Sweeper, ThrottleDecision};
pub use mailer::Mailer;
