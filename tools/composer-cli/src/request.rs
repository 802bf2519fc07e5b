//! Compose request file format.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use shared_types::AccountInfo;
use tx_composer::MsgTypeId;

/// A full compose request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    /// Sender account.
    pub account: AccountInfo,
    /// Transaction memo.
    #[serde(default)]
    pub memo: String,
    /// Gas limit override; the estimate is used when absent.
    #[serde(default)]
    pub gas_limit: Option<String>,
    /// Messages in transaction order.
    pub messages: Vec<MessageRequest>,
}

/// One message of a request.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Message type id (`send`, `vote`, ...) or full type URL.
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Raw field inputs.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Structured body, for contract messages.
    #[serde(default)]
    pub body: Option<Value>,
}

impl MessageRequest {
    /// Parsed message type.
    pub fn msg_type(&self) -> Result<MsgTypeId> {
        self.msg_type
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid message type {:?}", self.msg_type))
    }

    /// Body as editor text. Strings are taken verbatim.
    pub fn body_text(&self) -> Option<String> {
        self.body.as_ref().map(|body| match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

/// Comma-separated message type list.
pub fn parse_types(list: &str) -> Result<Vec<MsgTypeId>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(anyhow::Error::msg))
        .collect()
}
