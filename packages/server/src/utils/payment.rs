use common::DeclineCode;
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::CheckoutConfig;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Charge sent to the payment gateway.
#[derive(Debug, Serialize)]
pub struct ChargeRequest {
    pub amount: Decimal,
    pub currency: &'static str,
    pub customer_id: i32,
    pub payment_method: String,
    pub items: Vec<ChargeItem>,
}

#[derive(Debug, Serialize)]
pub struct ChargeItem {
    pub id: String,
    pub quantity: i64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ChargeOutcome {
    Approved {
        transaction_id: String,
        receipt_url: String,
    },
    Declined(DeclineCode),
}

/// In-process stand-in for the card processor.
#[derive(Debug, Clone)]
pub struct MockGateway {
    test_mode: bool,
    forced_decline: Option<DeclineCode>,
}

impl MockGateway {
    pub fn from_config(config: &CheckoutConfig) -> Self {
        let forced_decline = config.forced_decline.as_deref().map(|code| {
            code.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}, declining as card_declined");
                DeclineCode::CardDeclined
            })
        });
        Self {
            test_mode: config.test_mode,
            forced_decline,
        }
    }

    pub fn charge(&self, request: &ChargeRequest) -> ChargeOutcome {
        if let Some(code) = self.forced_decline {
            tracing::debug!(customer_id = request.customer_id, %code, "Gateway declining charge");
            return ChargeOutcome::Declined(code);
        }

        let prefix = if self.test_mode { "test_" } else { "" };
        ChargeOutcome::Approved {
            transaction_id: format!("{prefix}txn_{}", random_token(9)),
            receipt_url: format!("/receipts/{prefix}{}", random_token(9)),
        }
    }
}

/// Lowercase base-36 token of `len` characters.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}
