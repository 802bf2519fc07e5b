//! # Domain Entities
//!
//! Encoded messages, transaction drafts and per-unit field state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::StdFee;

use super::errors::FieldError;
use super::value_objects::MsgTypeId;
use crate::algorithms::canonical;

/// Canonical structured value for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedMessage {
    /// Protobuf type URL.
    pub type_url: String,
    /// Message fields, camelCase keys.
    pub value: Value,
}

impl EncodedMessage {
    /// Encoded message of the given type.
    pub fn new(msg_type: MsgTypeId, value: Value) -> Self {
        Self {
            type_url: msg_type.type_url().to_string(),
            value,
        }
    }

    /// Whether this message has the given type.
    pub fn is_type(&self, msg_type: MsgTypeId) -> bool {
        self.type_url == msg_type.type_url()
    }
}

/// Assembled, unsigned transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Sender account number.
    pub account_number: u64,
    /// Sender sequence.
    pub sequence: u64,
    /// Target chain.
    pub chain_id: String,
    /// Encoded messages in slot order.
    pub msgs: Vec<EncodedMessage>,
    /// Fee and gas limit.
    pub fee: StdFee,
    /// Free-form memo.
    pub memo: String,
}

impl TransactionDraft {
    /// Canonical JSON: sorted keys, no insignificant whitespace.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        Ok(canonical::to_canonical_string(&value))
    }
}

/// Current errors of a unit, keyed by field name.
///
/// Holds nothing for untouched fields; set by a failed validation or a live
/// edit, cleared when the field is edited again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, FieldError>);

impl FieldErrors {
    /// Record an error for `field`.
    pub fn set(&mut self, field: &'static str, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Clear the error of `field`.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Clear every error.
    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    /// Error of `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.get(field)
    }

    /// No errors recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Errors in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldError)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

/// A structured JSON body as last reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyField {
    text: String,
    parse_ok: bool,
}

impl Default for BodyField {
    fn default() -> Self {
        Self {
            text: String::new(),
            parse_ok: true,
        }
    }
}

impl BodyField {
    /// Record an edit. `content_errors` is the editor's parse verdict.
    pub fn edit(&mut self, text: &str, content_errors: bool) {
        self.text = text.to_string();
        self.parse_ok = !content_errors;
    }

    /// Raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Editor reported no errors and the text parses.
    pub fn is_parseable(&self) -> bool {
        self.parse_ok && self.canonical().is_some()
    }

    /// Canonicalized body, `None` while unparseable.
    pub fn canonical(&self) -> Option<Value> {
        if !self.parse_ok {
            return None;
        }
        canonical::canonicalize(&self.text).ok()
    }

    /// Canonical body or `{}`, so `msg` stays structurally valid.
    pub fn canonical_or_empty(&self) -> Value {
        self.canonical()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }
}
