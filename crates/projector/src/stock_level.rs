use serde::{Deserialize, Serialize};

/// Stock-level bucket driving the visual indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

/// Classification result: bucket plus bar-fill percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockGauge {
    pub level: StockLevel,
    /// Bar fill in percent, 10..=100.
    pub fill_percent: u8,
}

/// Classify a quantity into its display bucket.
///
/// This is a three-bucket, non-linear visual mapping, not a continuous scale;
/// the breakpoints and the Low floor are user-visible contracts:
///
/// - `< 50`: Low, fill proportional (`quantity / 50`), floored at 10% so a
///   near-empty bar stays visible
/// - `50..100`: Medium, fixed 50% fill regardless of the exact quantity
/// - `>= 100`: High, 100% fill
pub fn classify(quantity: u64) -> StockGauge {
    if quantity < 50 {
        let proportional = (quantity * 100 / 50) as u8;
        StockGauge {
            level: StockLevel::Low,
            fill_percent: proportional.max(10),
        }
    } else if quantity < 100 {
        StockGauge {
            level: StockLevel::Medium,
            fill_percent: 50,
        }
    } else {
        StockGauge {
            level: StockLevel::High,
            fill_percent: 100,
        }
    }
}
