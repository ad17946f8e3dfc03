//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ClientId` where a
//! `CashSessionId` is expected. The database keys are plain auto-increment
//! integers.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Wraps a raw database key.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw database key.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

typed_id!(ClientId, "Unique identifier for a customer.");
typed_id!(ProductId, "Unique identifier for a catalog product.");
typed_id!(AccountMovementId, "Unique identifier for a customer account movement.");
typed_id!(CashSessionId, "Unique identifier for a cash register session.");
typed_id!(CashMovementId, "Unique identifier for a cash session movement.");
typed_id!(SaleId, "Unique identifier for a sale, order or quotation.");
typed_id!(StockMovementId, "Unique identifier for a stock movement.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_and_parse() {
        let id = ClientId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(ClientId::from_str("42").unwrap(), id);
        assert!(ClientId::from_str("abc").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&CashSessionId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: CashSessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_inner(), 7);
    }
}
