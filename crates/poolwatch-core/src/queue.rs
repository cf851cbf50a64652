use std::collections::HashMap;

use aws_config::SdkConfig;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::types::QueueAttributeName;
use chrono::Utc;

use crate::error::CoreError;
use crate::model::{QueueSnapshot, QueueStats};

/// SQS client wrapper for reading approximate queue depths.
pub struct QueueWatch {
    client: Client,
    /// Queue names to watch; empty watches every queue in the region.
    queue_names: Vec<String>,
}

impl QueueWatch {
    /// Create a new `QueueWatch` from an already-resolved SDK config.
    pub fn new(config: &SdkConfig, queue_names: Vec<String>) -> Self {
        Self {
            client: Client::new(config),
            queue_names,
        }
    }

    /// Fetch message counts for every watched queue as one snapshot.
    pub async fn fetch_queues(&self) -> Result<QueueSnapshot, CoreError> {
        let urls = if self.queue_names.is_empty() {
            self.list_all_queue_urls().await?
        } else {
            self.resolve_queue_urls().await?
        };

        let mut queues = Vec::with_capacity(urls.len());
        for (name, url) in urls {
            queues.push(self.fetch_stats(name, url).await?);
        }

        Ok(QueueSnapshot {
            observed_at: Utc::now(),
            queues,
        })
    }

    /// Look up the URL of each explicitly named queue.
    async fn resolve_queue_urls(&self) -> Result<Vec<(String, String)>, CoreError> {
        let mut urls = Vec::with_capacity(self.queue_names.len());

        for name in &self.queue_names {
            let response = self
                .client
                .get_queue_url()
                .queue_name(name)
                .send()
                .await
                .map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(|e| e.is_queue_does_not_exist())
                    {
                        CoreError::Unavailable(format!("queue `{name}` not found"))
                    } else {
                        CoreError::from_sdk(err)
                    }
                })?;

            let url = response
                .queue_url
                .ok_or_else(|| CoreError::Unavailable(format!("no URL returned for queue `{name}`")))?;
            urls.push((name.clone(), url));
        }

        Ok(urls)
    }

    /// List every queue in the account/region.
    async fn list_all_queue_urls(&self) -> Result<Vec<(String, String)>, CoreError> {
        let mut urls = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_queues()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(CoreError::from_sdk)?;

            for url in page.queue_urls.unwrap_or_default() {
                urls.push((queue_name_from_url(&url), url));
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        Ok(urls)
    }

    async fn fetch_stats(&self, name: String, url: String) -> Result<QueueStats, CoreError> {
        let response = self
            .client
            .get_queue_attributes()
            .queue_url(&url)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessagesNotVisible)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessagesDelayed)
            .send()
            .await
            .map_err(CoreError::from_sdk)?;

        let attributes = response.attributes.unwrap_or_default();
        Ok(stats_from_attributes(name, url, &attributes))
    }
}

/// Last path segment of a queue URL is its name.
fn queue_name_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

/// Assemble stats from a `GetQueueAttributes` response.
///
/// The counts SQS returns are approximate strings; anything unparsable
/// counts as zero.
fn stats_from_attributes(
    name: String,
    url: String,
    attributes: &HashMap<QueueAttributeName, String>,
) -> QueueStats {
    let count = |attr: QueueAttributeName| -> u64 {
        attributes
            .get(&attr)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };

    QueueStats {
        available: count(QueueAttributeName::ApproximateNumberOfMessages),
        in_flight: count(QueueAttributeName::ApproximateNumberOfMessagesNotVisible),
        delayed: count(QueueAttributeName::ApproximateNumberOfMessagesDelayed),
        name,
        url,
    }
}
