//! Network-wide statistics (`GET /stats`).

use serde::{Deserialize, Serialize};

/// One gas price tier. Older instances report a bare number, newer ones an
/// object carrying the price next to fiat and timing estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GasPrice {
    Plain(f64),
    Tier {
        #[serde(default)]
        price: Option<f64>,
    },
}

impl GasPrice {
    /// Price in gwei, when reported.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Plain(price) => Some(*price),
            Self::Tier { price } => *price,
        }
    }
}

/// Gas price tiers in gwei.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasPrices {
    #[serde(default)]
    pub slow: Option<GasPrice>,
    #[serde(default)]
    pub average: Option<GasPrice>,
    #[serde(default)]
    pub fast: Option<GasPrice>,
}

/// Scalar statistics shown on the explorer front page.
///
/// Blockscout reports counters as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub total_blocks: Option<String>,
    #[serde(default)]
    pub total_addresses: Option<String>,
    #[serde(default)]
    pub total_transactions: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub average_block_time: Option<f64>,
    #[serde(default)]
    pub coin_price: Option<String>,
    #[serde(default)]
    pub network_utilization_percentage: Option<f64>,
    #[serde(default)]
    pub transactions_today: Option<String>,
    #[serde(default)]
    pub gas_prices: Option<GasPrices>,
}

impl NetworkStats {
    /// Average block time in seconds.
    #[must_use]
    pub fn average_block_time_secs(&self) -> Option<f64> {
        self.average_block_time.map(|ms| ms / 1000.0)
    }

    /// Coin price in USD, zero when unknown.
    #[must_use]
    pub fn coin_price_usd(&self) -> f64 {
        self.coin_price
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::JsonMother;

    #[test]
    fn test_stats_parsing() {
        let stats: NetworkStats = serde_json::from_value(JsonMother::stats()).unwrap();
        assert_eq!(stats.total_blocks.as_deref(), Some("1234567"));
        assert_eq!(stats.average_block_time_secs(), Some(2.5));
        assert!((stats.coin_price_usd() - 0.61234).abs() < f64::EPSILON);
        let average = stats.gas_prices.and_then(|g| g.average);
        assert_eq!(average.and_then(|g| g.price()), Some(0.02));
    }

    #[test]
    fn test_stats_tolerates_missing_fields() {
        let stats: NetworkStats = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(stats.coin_price_usd(), 0.0);
        assert!(stats.average_block_time_secs().is_none());
    }

    #[test]
    fn test_stats_accepts_gas_price_tiers() {
        let stats: NetworkStats = serde_json::from_value(serde_json::json!({
            "total_blocks": "10",
            "gas_prices": {
                "slow": {"price": 0.01, "fiat_price": null, "time": 15000.0},
                "average": {"price": 0.02, "fiat_price": "0.0001", "time": 9000.0},
                "fast": {"price": null, "fiat_price": null, "time": null}
            }
        }))
        .unwrap();

        let prices = stats.gas_prices.unwrap();
        assert_eq!(prices.slow.and_then(|g| g.price()), Some(0.01));
        assert_eq!(prices.average.and_then(|g| g.price()), Some(0.02));
        assert_eq!(prices.fast.and_then(|g| g.price()), None);
    }
}
