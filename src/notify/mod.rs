// ABOUTME: Deployment notifications to APM and webhook endpoints.
// ABOUTME: Both are config-gated and best-effort, never retried.

use crate::config::{ApmConfig, WebhookConfig};

/// Posts deployment events to the configured external endpoints.
///
/// An absent config section makes the corresponding call a no-op that
/// reports `false` without touching the network. Failures are reported
/// once; retrying is the operator's business.
pub struct Notifier {
    http: reqwest::Client,
    apm: Option<ApmConfig>,
    webhook: Option<WebhookConfig>,
}

impl Notifier {
    pub fn new(apm: Option<ApmConfig>, webhook: Option<WebhookConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            apm,
            webhook,
        }
    }

    /// Record the deployed revision with the APM service.
    ///
    /// Returns `true` only on a 2xx response; any non-2xx status or
    /// transport error is a plain failure.
    pub async fn notify_apm(&self, tag: &str) -> bool {
        let Some(apm) = &self.apm else {
            tracing::debug!("no APM config, skipping notification");
            return false;
        };

        let body = format!(
            "deployment[application_id]={}&deployment[revision]={}",
            urlencoding::encode(&apm.app_id),
            urlencoding::encode(tag)
        );

        let result = self
            .http
            .post(&apm.endpoint)
            .header("x-api-key", &apm.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(tag, "APM notified of deployment");
                true
            }
            Ok(response) => {
                tracing::warn!(tag, status = %response.status(), "APM notification rejected");
                false
            }
            Err(e) => {
                tracing::warn!(tag, error = %e, "APM notification failed");
                false
            }
        }
    }

    /// Post the revision tag to the configured webhook.
    ///
    /// The body is the configured extras concatenated with the tag,
    /// form-encoded. Same success contract as
    /// [`notify_apm`](Self::notify_apm).
    pub async fn run_webhook(&self, tag: &str) -> bool {
        let Some(webhook) = &self.webhook else {
            tracing::debug!("no webhook config, skipping");
            return false;
        };

        let tag_field = format!("tag={}", urlencoding::encode(tag));
        let body = if webhook.payload_extras.is_empty() {
            tag_field
        } else {
            format!("{}&{}", webhook.payload_extras, tag_field)
        };

        let result = self
            .http
            .post(&webhook.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!(tag, "webhook notified");
                true
            }
            Ok(response) => {
                tracing::warn!(tag, status = %response.status(), "webhook rejected");
                false
            }
            Err(e) => {
                tracing::warn!(tag, error = %e, "webhook call failed");
                false
            }
        }
    }
}
