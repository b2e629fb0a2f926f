use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Order Status
// ---------------------------------------------------------------------------

/// Lifecycle stage of an exchange order, as reported by the remote service.
///
/// The service owns the state machine; these are opaque tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "waiting_deposit")]
    WaitingDeposit,
    #[serde(rename = "deposit_received")]
    DepositReceived,
    #[serde(rename = "exchanging")]
    Exchanging,
    #[serde(rename = "sending")]
    Sending,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "time_expired")]
    TimeExpired,
    #[serde(rename = "payment_time_expired")]
    PaymentTimeExpired,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "sending_failed")]
    SendingFailed,
    #[serde(rename = "reverted")]
    Reverted,
    #[serde(rename = "payment_halted")]
    PaymentHalted,
    #[serde(rename = "EXPIRED")]
    Expired,
    #[serde(rename = "LESS")]
    Less,
}

impl OrderStatus {
    /// Every tag, in the order the service documents them.
    pub const ALL: [OrderStatus; 14] = [
        OrderStatus::New,
        OrderStatus::WaitingDeposit,
        OrderStatus::DepositReceived,
        OrderStatus::Exchanging,
        OrderStatus::Sending,
        OrderStatus::Success,
        OrderStatus::TimeExpired,
        OrderStatus::PaymentTimeExpired,
        OrderStatus::Failed,
        OrderStatus::SendingFailed,
        OrderStatus::Reverted,
        OrderStatus::PaymentHalted,
        OrderStatus::Expired,
        OrderStatus::Less,
    ];

    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::WaitingDeposit => "waiting_deposit",
            OrderStatus::DepositReceived => "deposit_received",
            OrderStatus::Exchanging => "exchanging",
            OrderStatus::Sending => "sending",
            OrderStatus::Success => "success",
            OrderStatus::TimeExpired => "time_expired",
            OrderStatus::PaymentTimeExpired => "payment_time_expired",
            OrderStatus::Failed => "failed",
            OrderStatus::SendingFailed => "sending_failed",
            OrderStatus::Reverted => "reverted",
            OrderStatus::PaymentHalted => "payment_halted",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Less => "LESS",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known status tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tags are case sensitive: "EXPIRED" and "time_expired" are distinct.
        OrderStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Request Flags
// ---------------------------------------------------------------------------

/// Whether a quote uses a floating or a fixed market rate (`fix` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateType {
    #[default]
    Floating,
    Fixed,
}

impl RateType {
    pub fn as_flag(&self) -> u8 {
        match self {
            RateType::Floating => 0,
            RateType::Fixed => 1,
        }
    }
}

/// What to do with an expired payment (`needExchange` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyAction {
    /// Continue the exchange at the current market rate.
    Exchange,
    /// Send the deposit back. The service requires a refund address.
    Refund,
}

impl EmergencyAction {
    pub fn as_flag(&self) -> u8 {
        match self {
            EmergencyAction::Exchange => 1,
            EmergencyAction::Refund => 0,
        }
    }
}

/// Largest page size the exchange history endpoint accepts.
pub const HISTORY_LIMIT_MAX: u32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_wire_tag() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_tags_are_case_sensitive() {
        assert_eq!("EXPIRED".parse::<OrderStatus>(), Ok(OrderStatus::Expired));
        assert!("expired".parse::<OrderStatus>().is_err());
        assert!("Success".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_wire_tags() {
        let json = serde_json::to_string(&OrderStatus::PaymentTimeExpired).unwrap();
        assert_eq!(json, "\"payment_time_expired\"");

        let status: OrderStatus = serde_json::from_str("\"LESS\"").unwrap();
        assert_eq!(status, OrderStatus::Less);
    }

    #[test]
    fn test_flags() {
        assert_eq!(RateType::default(), RateType::Floating);
        assert_eq!(RateType::Floating.as_flag(), 0);
        assert_eq!(RateType::Fixed.as_flag(), 1);
        assert_eq!(EmergencyAction::Exchange.as_flag(), 1);
        assert_eq!(EmergencyAction::Refund.as_flag(), 0);
    }
}
