//! Ownership-change notifications.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// One logical ownership-change notification.
///
/// Issuance produces one event per unit with `from == None` even though the
/// ledger writes a single record per batch: the event log is the
/// O(quantity) notification channel, storage work stays O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferEvent {
    /// Previous holder; `None` for freshly issued units.
    pub from: Option<Identity>,
    /// New holder.
    pub to: Identity,
    /// The unit that changed hands.
    pub unit_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuance_event_serializes_with_a_null_sender() {
        let event = TransferEvent {
            from: None,
            to: Identity::from_bytes([1u8; 20]),
            unit_id: 7,
        };

        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["from"], serde_json::Value::Null);
        assert_eq!(json["unit_id"], 7);

        let decoded: TransferEvent =
            serde_json::from_value(json).expect("event deserializes");
        assert_eq!(decoded, event);
    }
}
