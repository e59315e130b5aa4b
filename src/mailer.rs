// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification mail dispatch for accepted contact submissions.
//!
//! The transport is an HTTP mail API. When no endpoint is configured the
//! mailer is disabled and dispatch is a logged no-op, which is also what
//! tests use.

use crate::config::MailConfig;
use crate::models::ContactSubmission;
use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Outbound message payload for the mail API.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Mail dispatcher.
pub enum Mailer {
    Http(HttpMailer),
    Disabled,
}

impl Mailer {
    /// Build a mailer from configuration; disabled unless an endpoint is set.
    pub fn from_config(config: &MailConfig) -> Self {
        match &config.endpoint {
            Some(endpoint) => Self::Http(HttpMailer::new(
                endpoint.clone(),
                config.api_key.clone(),
                config.from.clone(),
                config.to.clone(),
            )),
            None => Self::Disabled,
        }
    }

    /// Send the new-submission notification.
    pub async fn send_contact_notification(&self, contact: &ContactSubmission) -> Result<()> {
        match self {
            Self::Http(mailer) => mailer.send_contact_notification(contact).await,
            Self::Disabled => {
                debug!(id = %contact.id, "Mail disabled, skipping notification");
                Ok(())
            }
        }
    }
}

/// HTTP mail API client
pub struct HttpMailer {
    endpoint: String,
    api_key: Option<String>,
    from: String,
    to: String,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>, from: String, to: String) -> Self {
        Self {
            endpoint,
            api_key,
            from,
            to,
            client: reqwest::Client::new(),
        }
    }

    async fn send_contact_notification(&self, contact: &ContactSubmission) -> Result<()> {
        let mail = OutboundMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: format!("Portfolio contact: {}", contact.subject),
            text: notification_body(contact),
        };

        let mut request = self.client.post(&self.endpoint).json(&mail);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if response.status().is_success() {
            info!(id = %contact.id, "Contact notification dispatched");
            Ok(())
        } else {
            Err(anyhow!("Mail API error: {}", response.status()))
        }
    }
}

/// Plain-text notification body for a submission.
fn notification_body(contact: &ContactSubmission) -> String {
    let fill_secs = contact.form_duration_ms / 1000;
    format!(
        "New contact form submission\n\
         \n\
         Name: {name}\n\
         Subject: {subject}\n\
         Fill time: {fill_secs}s\n\
         \n\
         {message}\n\
         \n\
         IP address: {ip}\n\
         User agent: {agent}\n\
         Submitted: {submitted}\n",
        name = contact.name,
        subject = contact.subject,
        message = contact.message,
        ip = contact.ip_address,
        agent = contact.user_agent.as_deref().unwrap_or("Unknown"),
        submitted = contact.submitted_at.to_rfc3339(),
    )
}
