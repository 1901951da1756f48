//! Out-of-band control messages from pages.

use serde_json::Value;

/// The recognized message payload.
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// A control message the worker acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Stop waiting for old pages to close and activate now.
    SkipWaiting,
}

impl ControlMessage {
    /// Parse a posted message. Only the exact string `"SKIP_WAITING"` is
    /// recognized; anything else, including objects, is ignored.
    pub fn parse(data: &Value) -> Option<Self> {
        match data {
            Value::String(s) if s == SKIP_WAITING => Some(Self::SkipWaiting),
            _ => None,
        }
    }
}
