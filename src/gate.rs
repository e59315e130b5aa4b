// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission gate.
//!
//! A short-circuiting chain of anti-abuse checks over an incoming contact
//! form request, ordered cheapest first:
//! - required field presence
//! - arithmetic CAPTCHA echo comparison
//! - honeypot field
//! - per-client submission throttle
//! - fill-time heuristic
//! - content heuristics (URLs, spam keywords, repeated characters,
//!   markup, all-caps runs)
//! - length bounds and minimum word count

use crate::config::GateConfig;
use crate::limiter::{SubmissionThrottle, ThrottleDecision};
use crate::models::ContactRequest;
use regex::Regex;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A character repeated this many times in a row marks the content as spam.
const MAX_CHAR_RUN: usize = 11;

/// Distinct rejection reasons, one per check in the chain.
///
/// Display strings double as the client-facing messages.
#[derive(Debug, Error, Clone)]
pub enum Rejection {
    #[error("Name, subject, and message are required")]
    MissingFields,

    #[error("Invalid security check answer")]
    CaptchaMismatch,

    #[error("Spam detected")]
    HoneypotTripped,

    #[error("Please wait before submitting again")]
    RateLimited { retry_after: Duration },

    #[error("Form submitted too quickly")]
    SubmittedTooQuickly,

    #[error("Message contains suspicious content")]
    SuspiciousContent,

    #[error("Input exceeds maximum length")]
    FieldTooLong,

    #[error("Message is too short")]
    MessageTooShort,
}

impl Rejection {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Contact submission gate with precompiled content patterns.
pub struct SubmissionGate {
    config: GateConfig,
    url_pattern: Regex,
    /// None when the keyword list is empty, since an empty alternation
    /// would match everywhere.
    spam_pattern: Option<Regex>,
    markup_pattern: Regex,
    caps_pattern: Regex,
}

impl SubmissionGate {
    /// Build a gate from configuration, compiling the content patterns once.
    pub fn new(config: GateConfig) -> Result<Self, regex::Error> {
        let spam_pattern = if config.spam_keywords.is_empty() {
            None
        } else {
            let keywords = config
                .spam_keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{keywords})\b"))?)
        };

        Ok(Self {
            url_pattern: Regex::new(r"https?://")?,
            spam_pattern,
            markup_pattern: Regex::new(r"<[^>]*>")?,
            caps_pattern: Regex::new(r"\b[A-Z]{5,}\b")?,
            config,
        })
    }

    /// Run the full validation chain for one request.
    ///
    /// `now_ms` is the server receive time in epoch milliseconds, passed in
    /// so tests control the clock. The throttle is consulted (and this
    /// attempt recorded) between the honeypot and fill-time checks.
    pub async fn evaluate(
        &self,
        request: &ContactRequest,
        client: IpAddr,
        throttle: &SubmissionThrottle,
        now_ms: i64,
    ) -> Result<(), Rejection> {
        if request.name.trim().is_empty()
            || request.subject.trim().is_empty()
            || request.message.trim().is_empty()
        {
            debug!(%client, "Missing required fields");
            return Err(Rejection::MissingFields);
        }

        if !self.captcha_matches(request) {
            debug!(%client, "CAPTCHA mismatch");
            return Err(Rejection::CaptchaMismatch);
        }

        if let Some(website) = &request.website {
            if !website.trim().is_empty() {
                debug!(%client, "Honeypot field filled");
                return Err(Rejection::HoneypotTripped);
            }
        }

        if let ThrottleDecision::Limited { retry_after } = throttle.check_and_record(client).await {
            debug!(%client, ?retry_after, "Client inside submission window");
            return Err(Rejection::RateLimited { retry_after });
        }

        if let Some(started) = request.form_start_time {
            if now_ms - started < self.config.min_fill_ms {
                debug!(%client, elapsed_ms = now_ms - started, "Form filled too quickly");
                return Err(Rejection::SubmittedTooQuickly);
            }
        }

        let combined = format!("{} {} {}", request.name, request.subject, request.message);
        if self.content_is_suspicious(&combined) {
            debug!(%client, "Content heuristics tripped");
            return Err(Rejection::SuspiciousContent);
        }

        if request.name.chars().count() > self.config.max_name_chars
            || request.subject.chars().count() > self.config.max_subject_chars
            || request.message.chars().count() > self.config.max_message_chars
        {
            debug!(%client, "Field length bound exceeded");
            return Err(Rejection::FieldTooLong);
        }

        if request.message.split_whitespace().count() < self.config.min_message_words {
            debug!(%client, "Message below minimum word count");
            return Err(Rejection::MessageTooShort);
        }

        debug!(%client, "Submission passed all checks");
        Ok(())
    }

    /// The answer must parse as an integer equal to the expected value the
    /// client echoed back. A missing answer or missing expectation rejects.
    fn captcha_matches(&self, request: &ContactRequest) -> bool {
        match (&request.captcha_answer, request.captcha_expected) {
            (Some(answer), Some(expected)) => {
                answer.trim().parse::<i64>().is_ok_and(|n| n == expected)
            }
            _ => false,
        }
    }

    /// Content heuristics over the combined name/subject/message text.
    ///
    /// Keyword, URL, markup, and repeat scans run on the lowercased text;
    /// the caps-run scan runs on the original text since lowercasing would
    /// erase exactly what it looks for.
    fn content_is_suspicious(&self, combined: &str) -> bool {
        let lowered = combined.to_lowercase();

        self.url_pattern.is_match(&lowered)
            || self
                .spam_pattern
                .as_ref()
                .is_some_and(|p| p.is_match(&lowered))
            || self.markup_pattern.is_match(&lowered)
            || has_char_run(&lowered, MAX_CHAR_RUN)
            || self.caps_pattern.is_match(combined)
    }
}

/// Whether `text` contains `min_run` or more identical consecutive characters.
///
/// The regex crate has no backreferences, so this is a plain scan.
fn has_char_run(text: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run >= min_run {
            return true;
        }
    }
    false
}
