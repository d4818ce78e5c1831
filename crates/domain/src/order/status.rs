//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// Legal transitions:
/// ```text
/// Processing ──┬──► Shipped ──► Delivered
///              ├──► Delivered
///              └──► Cancelled
/// ```
/// `Delivered` and `Cancelled` are terminal. Everything else is rejected,
/// including self-transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Initial state: order accepted, fulfillment not started.
    #[default]
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Reached the customer (terminal state).
    Delivered,

    /// Backed out before or during fulfillment (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the transition to `to` appears in the table.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Processing, Shipped) | (Processing, Delivered) | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }

    /// Returns true if items and shipping address may still be edited.
    ///
    /// Only an order that has never left its initial state is editable.
    pub fn can_modify(&self) -> bool {
        matches!(self, OrderStatus::Processing)
    }

    /// Returns true if the owning customer may still cancel unilaterally.
    ///
    /// The customer's right to back out is time-boxed to before fulfillment
    /// begins; staff drive the pipeline through the transition table instead.
    pub fn customer_can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Processing)
    }

    /// Returns true if no further transitions are permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 4] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn default_status_is_processing() {
        assert_eq!(OrderStatus::default(), OrderStatus::Processing);
    }

    #[test]
    fn transition_table_is_exact() {
        let legal = [
            (OrderStatus::Processing, OrderStatus::Shipped),
            (OrderStatus::Processing, OrderStatus::Delivered),
            (OrderStatus::Processing, OrderStatus::Cancelled),
            (OrderStatus::Shipped, OrderStatus::Delivered),
        ];

        for from in ALL {
            for to in ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in ALL {
            assert!(!status.can_transition_to(status), "{status} -> {status}");
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for to in ALL {
                assert!(!terminal.can_transition_to(to));
            }
        }
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn only_processing_is_editable() {
        assert!(OrderStatus::Processing.can_modify());
        assert!(!OrderStatus::Shipped.can_modify());
        assert!(!OrderStatus::Delivered.can_modify());
        assert!(!OrderStatus::Cancelled.can_modify());
    }

    #[test]
    fn customer_cancel_window_closes_at_shipment() {
        assert!(OrderStatus::Processing.customer_can_cancel());
        assert!(!OrderStatus::Shipped.customer_can_cancel());
        assert!(!OrderStatus::Delivered.customer_can_cancel());
        assert!(!OrderStatus::Cancelled.customer_can_cancel());
    }

    #[test]
    fn display_and_serialization() {
        assert_eq!(OrderStatus::Shipped.to_string(), "Shipped");
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"Cancelled\"");
        let back: OrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }
}
