use chrono::{DateTime, Datelike, Utc};

/// Key id the mock vault encrypts with.
pub const VAULT_KEY_ID: &str = "key_vault_2024_09_10";
pub const VAULT_ALGORITHM: &str = "AES-256-GCM";
pub const VAULT_VERSION: &str = "2.1.0";
/// Opaque blob handed out in place of real ciphertext.
pub const ENCRYPTED_CARD_DATA: &str = "enc_4f8b2c1a9e3d7f2b8c4e6a1d3f5g7h9j";
/// Transactions above this amount need manual card entry.
pub const HIGH_VALUE_LIMIT: f64 = 1000.0;

/// A card held in the mock vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCard {
    pub id: &'static str,
    pub card_number: &'static str,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: &'static str,
    pub cardholder_name: &'static str,
    pub is_default: bool,
    pub last_used: &'static str,
    pub card_type: &'static str,
}

const STORED_CARDS: &[(i32, StoredCard)] = &[
    (
        211,
        StoredCard {
            id: "pm_1234567890",
            card_number: "4532123456789012",
            expiry_month: 12,
            expiry_year: 2027,
            cvv: "123",
            cardholder_name: "John Doe",
            is_default: true,
            last_used: "2025-09-01T10:30:00Z",
            card_type: "visa",
        },
    ),
    (
        212,
        StoredCard {
            id: "pm_0987654321",
            card_number: "5555444433221111",
            expiry_month: 8,
            expiry_year: 2026,
            cvv: "456",
            cardholder_name: "Jane Smith",
            is_default: true,
            last_used: "2025-08-28T14:22:00Z",
            card_type: "mastercard",
        },
    ),
];

/// Decrypted card returned for the single supported key.
pub struct DecryptedCard {
    pub card_number: &'static str,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub security_code: &'static str,
    pub card_holder_name: &'static str,
    pub billing_zip_code: &'static str,
    pub issuing_bank: &'static str,
}

pub const DECRYPTED_CARD: DecryptedCard = DecryptedCard {
    card_number: "4532123456789012",
    expiry_month: 12,
    expiry_year: 2027,
    security_code: "123",
    card_holder_name: "John Doe",
    billing_zip_code: "90210",
    issuing_bank: "Chase Bank",
};

/// The default card for a user, falling back to the first one stored.
pub fn default_card(user_id: i32) -> Option<&'static StoredCard> {
    let mut cards = STORED_CARDS
        .iter()
        .filter(|(owner, _)| *owner == user_id)
        .map(|(_, card)| card)
        .peekable();
    let first = *cards.peek()?;
    Some(cards.find(|card| card.is_default).unwrap_or(first))
}

impl StoredCard {
    /// A card is valid through the end of its expiry month.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let (year, month) = (now.year(), now.month());
        self.expiry_year < year || (self.expiry_year == year && self.expiry_month < month)
    }

    /// `**M/YY`, e.g. `**12/27`.
    pub fn expiry_hint(&self) -> String {
        format!("**{}/{:02}", self.expiry_month, self.expiry_year.rem_euclid(100))
    }
}
