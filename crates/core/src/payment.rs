//! Card handling and the simulated payment gateway.
//!
//! Card numbers and CVVs exist only in transit: validation derives the
//! network and last four digits, and nothing else is ever persisted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Card network, derived from the number's leading digits.
/// Stored as the `card_network` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "card_network", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
    UnionPay,
    Cb,
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "Visa",
            CardNetwork::Mastercard => "Mastercard",
            CardNetwork::Amex => "AMEX",
            CardNetwork::Discover => "Discover",
            CardNetwork::Jcb => "JCB",
            CardNetwork::Diners => "Diners",
            CardNetwork::UnionPay => "UnionPay",
            CardNetwork::Cb => "CB",
        }
    }
}

/// Fixed prefix table mapping leading digits to a network.
/// `Cb` is the catch-all for unrecognized prefixes.
pub fn detect_network(number: &str) -> CardNetwork {
    let cleaned: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    let two = cleaned.get(..2).unwrap_or("");
    if cleaned.starts_with('4') {
        CardNetwork::Visa
    } else if matches!(two, "51" | "52" | "53" | "54" | "55") {
        CardNetwork::Mastercard
    } else if matches!(two, "34" | "37") {
        CardNetwork::Amex
    } else if cleaned.starts_with("35") {
        CardNetwork::Jcb
    } else if matches!(two, "30" | "36" | "38") {
        CardNetwork::Diners
    } else if cleaned.starts_with("62") {
        CardNetwork::UnionPay
    } else if cleaned.starts_with('6') {
        CardNetwork::Discover
    } else {
        CardNetwork::Cb
    }
}

/// Masked card descriptor recorded on paid reservations, e.g. `Visa •••• 4242`.
pub fn masked_descriptor(network: CardNetwork, last_four: &str) -> String {
    format!("{} •••• {last_four}", network.as_str())
}

/// How the client wants to pay: a stored card or freshly entered details.
///
/// Tagged union consumed by a single payment handler, replacing any
/// duck-typed "card-like" object.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentSource {
    ExistingCard {
        card_id: DbId,
    },
    NewCard {
        name: String,
        number: String,
        expiry: String,
        cvv: String,
        #[serde(default)]
        save_card: bool,
    },
}

/// Card details validated and reduced to the persistable subset.
#[derive(Debug, Clone)]
pub struct ValidatedCard {
    pub name: String,
    pub network: CardNetwork,
    pub last_four: String,
    pub expiry: String,
}

/// Validate freshly entered card details.
///
/// The PAN must be 13-19 digits and the CVV 3-4 digits after stripping
/// whitespace. The CVV is checked and discarded.
pub fn validate_new_card(
    name: &str,
    number: &str,
    expiry: &str,
    cvv: &str,
) -> Result<ValidatedCard, CoreError> {
    let name = name.trim();
    let expiry = expiry.trim();
    if name.is_empty() || expiry.is_empty() {
        return Err(CoreError::Validation("All card fields are required".into()));
    }
    let cleaned: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() < 13 || cleaned.len() > 19 || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation("Invalid card number".into()));
    }
    if cvv.len() < 3 || cvv.len() > 4 || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation("Invalid CVV".into()));
    }
    Ok(ValidatedCard {
        name: name.to_string(),
        network: detect_network(&cleaned),
        last_four: cleaned[cleaned.len() - 4..].to_string(),
        expiry: expiry.to_string(),
    })
}

/// Simulated card gateway: fixed latency, fixed success probability.
///
/// There is no real authorization, idempotency key, or retry -- a failed
/// attempt leaves the reservation untouched and the caller re-prompts.
#[derive(Debug, Clone)]
pub struct PaymentGateway {
    /// Probability of a charge succeeding, in `[0, 1]`. Production default 0.95.
    pub success_rate: f64,
    /// Artificial network latency applied to every attempt. Bounded, sub-second.
    pub latency: Duration,
}

impl Default for PaymentGateway {
    fn default() -> Self {
        Self {
            success_rate: 0.95,
            latency: Duration::from_millis(300),
        }
    }
}

impl PaymentGateway {
    /// Attempt a charge against the given card. Returns whether it succeeded.
    pub async fn charge(&self, last_four: &str) -> bool {
        tokio::time::sleep(self.latency).await;
        if last_four.is_empty() {
            return false;
        }
        rand::random::<f64>() < self.success_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_networks_from_prefixes() {
        assert_eq!(detect_network("4242 4242 4242 4242"), CardNetwork::Visa);
        assert_eq!(detect_network("5500000000000004"), CardNetwork::Mastercard);
        assert_eq!(detect_network("340000000000009"), CardNetwork::Amex);
        assert_eq!(detect_network("3530111333300000"), CardNetwork::Jcb);
        assert_eq!(detect_network("36700102000000"), CardNetwork::Diners);
        assert_eq!(detect_network("6200000000000005"), CardNetwork::UnionPay);
        assert_eq!(detect_network("6011000990139424"), CardNetwork::Discover);
        assert_eq!(detect_network("9999999999999"), CardNetwork::Cb);
    }

    #[test]
    fn validate_accepts_spaced_number_and_keeps_last_four() {
        let card = validate_new_card("Jo", "4242 4242 4242 4242", "12/27", "123").unwrap();
        assert_eq!(card.network, CardNetwork::Visa);
        assert_eq!(card.last_four, "4242");
    }

    #[test]
    fn validate_rejects_bad_lengths() {
        assert!(validate_new_card("Jo", "4242", "12/27", "123").is_err());
        assert!(validate_new_card("Jo", "4242424242424242", "12/27", "12").is_err());
        assert!(validate_new_card("Jo", "4242424242424242", "12/27", "12345").is_err());
        assert!(validate_new_card("", "4242424242424242", "12/27", "123").is_err());
    }

    #[test]
    fn descriptor_is_masked() {
        assert_eq!(
            masked_descriptor(CardNetwork::Visa, "4242"),
            "Visa •••• 4242"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gateway_extremes_are_deterministic() {
        let always = PaymentGateway {
            success_rate: 1.0,
            latency: Duration::ZERO,
        };
        let never = PaymentGateway {
            success_rate: 0.0,
            latency: Duration::ZERO,
        };
        assert!(always.charge("4242").await);
        assert!(!never.charge("4242").await);
        // Missing card details always decline, regardless of rate.
        assert!(!always.charge("").await);
    }
}
