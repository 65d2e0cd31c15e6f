//! The closed set of support-conversation intents.
//!
//! Every classification result maps to exactly one of these nine labels.
//! Backends that produce a label outside this set must coerce it to
//! [`Intent::Greeting`] with a penalty confidence rather than inventing a
//! tenth category.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user-utterance intent in an e-commerce support conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Salutations and session openers.
    Greeting,
    /// Product search, pricing, features, stock questions.
    ProductInquiry,
    /// Order tracking and delivery-status questions.
    OrderStatus,
    /// Adding to, removing from, or inspecting the shopping cart.
    CartOperations,
    /// Payment failures, card problems, installment questions.
    PaymentIssues,
    /// Returns, refunds, and product exchanges.
    ReturnRefund,
    /// Shipping costs, carriers, and delivery windows.
    ShippingInfo,
    /// Farewells and session closers.
    Goodbye,
    /// Complaints and dissatisfaction reports.
    Complaint,
}

impl Intent {
    /// All intents, in canonical order. The position of each variant is its
    /// stable class index for the trained models.
    pub const ALL: [Intent; 9] = [
        Intent::Greeting,
        Intent::ProductInquiry,
        Intent::OrderStatus,
        Intent::CartOperations,
        Intent::PaymentIssues,
        Intent::ReturnRefund,
        Intent::ShippingInfo,
        Intent::Goodbye,
        Intent::Complaint,
    ];

    /// Canonical snake_case label, as it appears in datasets and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::ProductInquiry => "product_inquiry",
            Intent::OrderStatus => "order_status",
            Intent::CartOperations => "cart_operations",
            Intent::PaymentIssues => "payment_issues",
            Intent::ReturnRefund => "return_refund",
            Intent::ShippingInfo => "shipping_info",
            Intent::Goodbye => "goodbye",
            Intent::Complaint => "complaint",
        }
    }

    /// Parse a label into an intent. Returns `None` for anything outside the
    /// nine-label set; the caller decides how to penalize unknown labels.
    pub fn parse(label: &str) -> Option<Intent> {
        match label.trim().to_lowercase().as_str() {
            "greeting" => Some(Intent::Greeting),
            "product_inquiry" => Some(Intent::ProductInquiry),
            "order_status" => Some(Intent::OrderStatus),
            "cart_operations" => Some(Intent::CartOperations),
            "payment_issues" => Some(Intent::PaymentIssues),
            "return_refund" => Some(Intent::ReturnRefund),
            "shipping_info" => Some(Intent::ShippingInfo),
            "goodbye" => Some(Intent::Goodbye),
            "complaint" => Some(Intent::Complaint),
            _ => None,
        }
    }

    /// Stable class index of this intent within [`Intent::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn test_parse_is_case_and_whitespace_tolerant() {
        assert_eq!(Intent::parse("  Product_Inquiry "), Some(Intent::ProductInquiry));
        assert_eq!(Intent::parse("GREETING"), Some(Intent::Greeting));
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert_eq!(Intent::parse("chitchat"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (position, intent) in Intent::ALL.iter().enumerate() {
            assert_eq!(intent.index(), position);
        }
    }

    #[test]
    fn test_serde_uses_snake_case_labels() {
        let json = serde_json::to_string(&Intent::ReturnRefund).unwrap();
        assert_eq!(json, "\"return_refund\"");

        let parsed: Intent = serde_json::from_str("\"cart_operations\"").unwrap();
        assert_eq!(parsed, Intent::CartOperations);
    }
}
