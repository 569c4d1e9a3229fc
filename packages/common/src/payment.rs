use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reason a payment gateway refused a charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeclineCode {
    InsufficientFunds,
    CardDeclined,
    ExpiredCard,
    InvalidCvc,
    ProcessingError,
    /// Soft decline; the issuer may accept the same charge later.
    TemporaryDecline,
}

impl DeclineCode {
    pub const ALL: &'static [DeclineCode] = &[
        Self::InsufficientFunds,
        Self::CardDeclined,
        Self::ExpiredCard,
        Self::InvalidCvc,
        Self::ProcessingError,
        Self::TemporaryDecline,
    ];

    /// Customer-facing explanation for this decline.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InsufficientFunds => "Your card has insufficient funds for this transaction.",
            Self::CardDeclined => "Your card was declined. Please try a different payment method.",
            Self::ExpiredCard => "Your card has expired. Please update your payment information.",
            Self::InvalidCvc => "The security code you entered is invalid.",
            Self::ProcessingError => {
                "There was an error processing your payment. Please try again."
            }
            Self::TemporaryDecline => GENERIC_DECLINE_MESSAGE,
        }
    }

    /// Whether retrying the same payment can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProcessingError | Self::TemporaryDecline)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientFunds => "insufficient_funds",
            Self::CardDeclined => "card_declined",
            Self::ExpiredCard => "expired_card",
            Self::InvalidCvc => "invalid_cvc",
            Self::ProcessingError => "processing_error",
            Self::TemporaryDecline => "temporary_decline",
        }
    }
}

/// Shown for decline codes without a dedicated message.
pub const GENERIC_DECLINE_MESSAGE: &str = "Your payment could not be processed. Please try again.";

impl fmt::Display for DeclineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclineCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| format!("unknown decline code: {s}"))
    }
}

/// Payment methods accepted at checkout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    ApplePay,
    GooglePay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "apple_pay" => Ok(Self::ApplePay),
            "google_pay" => Ok(Self::GooglePay),
            other => Err(format!("Invalid payment method: {other}")),
        }
    }
}
