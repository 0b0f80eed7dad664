use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};

/// Stock status of a record. Always derived from quantity, never set directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    InStock,
    OutOfStock,
    /// Reserved. No current rule produces it, but it is accepted as a list filter.
    Backordered,
}

impl InventoryStatus {
    pub const ALL: [InventoryStatus; 3] = [
        InventoryStatus::InStock,
        InventoryStatus::OutOfStock,
        InventoryStatus::Backordered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::InStock => "IN_STOCK",
            InventoryStatus::OutOfStock => "OUT_OF_STOCK",
            InventoryStatus::Backordered => "BACKORDERED",
        }
    }
}

impl core::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = DomainError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        InventoryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::invalid_argument(format!("invalid inventory status: {s}")))
    }
}

/// `quantity <= 0` is out of stock, anything above is in stock.
pub fn derive_status(quantity: i64) -> InventoryStatus {
    if quantity <= 0 {
        InventoryStatus::OutOfStock
    } else {
        InventoryStatus::InStock
    }
}

/// Parse an optional list filter. Absent or blank means "no filter".
pub fn parse_status_filter(filter: Option<&str>) -> DomainResult<Option<InventoryStatus>> {
    match filter {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_out_of_stock() {
        assert_eq!(derive_status(0), InventoryStatus::OutOfStock);
        assert_eq!(derive_status(1), InventoryStatus::InStock);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("in_stock".parse::<InventoryStatus>().unwrap(), InventoryStatus::InStock);
        assert_eq!(
            "Out_Of_Stock".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::OutOfStock
        );
        assert_eq!(
            " BACKORDERED ".parse::<InventoryStatus>().unwrap(),
            InventoryStatus::Backordered
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "bogus".parse::<InventoryStatus>().unwrap_err();
        assert_eq!(err, DomainError::invalid_argument("invalid inventory status: bogus"));
    }

    #[test]
    fn blank_filter_means_no_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("")).unwrap(), None);
        assert_eq!(parse_status_filter(Some("   ")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("in_stock")).unwrap(),
            Some(InventoryStatus::InStock)
        );
        assert!(parse_status_filter(Some("in stock")).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn derived_status_is_in_stock_iff_positive(q in 0i64..=i64::MAX) {
            let status = derive_status(q);
            prop_assert_eq!(status == InventoryStatus::InStock, q > 0);
            prop_assert_ne!(status, InventoryStatus::Backordered);
        }
    }
}
