use std::collections::HashMap;

use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use tracing::warn;

use crate::error::CoreError;
use crate::model::{RecordWarning, Snapshot, WorkItem};

/// Attributes the monitor reads; everything else on the item is ignored.
const PROJECTION: &str = "entity_name, expires, uid";

/// DynamoDB client wrapper for reading the work-pool table.
pub struct WorkPoolStore {
    client: Client,
    table_name: String,
}

impl WorkPoolStore {
    /// Create a new `WorkPoolStore` from an already-resolved SDK config.
    pub fn new(config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            table_name: table_name.into(),
        }
    }

    /// The DynamoDB table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Scan the whole table and return one point-in-time snapshot.
    ///
    /// Items that fail to decode are skipped and carried in the snapshot as
    /// warnings; a failed scan call fails the whole tick.
    pub async fn scan_work_pool(&self) -> Result<Snapshot, CoreError> {
        let mut items = Vec::new();
        let mut invalid = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression(PROJECTION)
                .set_exclusive_start_key(start_key.take());

            let page = request.send().await.map_err(CoreError::from_sdk)?;

            for raw in page.items.unwrap_or_default() {
                match decode_item(raw) {
                    Ok(item) => items.push(item),
                    Err(CoreError::InvalidRecord { key, reason }) => {
                        warn!(key = %key, reason = %reason, "skipping undecodable work-pool item");
                        invalid.push(RecordWarning { key, reason });
                    }
                    Err(other) => return Err(other),
                }
            }

            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(Snapshot::new(Utc::now(), items, invalid))
    }
}

/// Decode one raw DynamoDB item into a [`WorkItem`].
///
/// Failures name the item's `uid` so the operator can find the bad row.
fn decode_item(raw: HashMap<String, AttributeValue>) -> Result<WorkItem, CoreError> {
    let key = raw
        .get("uid")
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_else(|| "<unknown>".to_string());

    serde_dynamo::aws_sdk_dynamodb_1::from_item(raw)
        .map_err(|e| CoreError::InvalidRecord {
            key,
            reason: e.to_string(),
        })
}
