//! Supported asset catalog shared by the coordinator and the render layer.

/// One entry of the widget's asset universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetInfo {
    pub ticker: &'static str,
    pub name: &'static str,
}

/// Assets the widget can show in the deposit and trade lists.
pub const SUPPORTED_ASSETS: &[AssetInfo] = &[
    AssetInfo { ticker: "BAT", name: "Basic Attention Token" },
    AssetInfo { ticker: "BTC", name: "Bitcoin" },
    AssetInfo { ticker: "ETH", name: "Ethereum" },
    AssetInfo { ticker: "XRP", name: "Ripple" },
    AssetInfo { ticker: "BNB", name: "Binance Coin" },
    AssetInfo { ticker: "BCH", name: "Bitcoin Cash" },
    AssetInfo { ticker: "BUSD", name: "US Dollar" },
    AssetInfo { ticker: "LINK", name: "Chainlink" },
    AssetInfo { ticker: "LTC", name: "Litecoin" },
];

/// Subset eligible for the convert flow.
pub const CONVERTIBLE_ASSETS: &[&str] = &["BTC", "ETH", "XRP", "BNB", "BCH", "BUSD"];

pub fn is_supported(ticker: &str) -> bool {
    SUPPORTED_ASSETS.iter().any(|a| a.ticker == ticker)
}

pub fn is_convertible(ticker: &str) -> bool {
    CONVERTIBLE_ASSETS.contains(&ticker)
}

/// Human-readable name, falling back to the ticker itself.
pub fn display_name(ticker: &str) -> &str {
    SUPPORTED_ASSETS
        .iter()
        .find(|a| a.ticker == ticker)
        .map(|a| a.name)
        .unwrap_or(ticker)
}

/// Convert destinations offered for `from`.
pub fn convert_targets(from: &str) -> Vec<&'static str> {
    CONVERTIBLE_ASSETS
        .iter()
        .copied()
        .filter(|t| *t != from)
        .collect()
}

/// Next convertible asset after `current`, cycling through the subset.
pub fn next_convertible(current: &str) -> &'static str {
    let idx = CONVERTIBLE_ASSETS
        .iter()
        .position(|t| *t == current)
        .unwrap_or(0);
    CONVERTIBLE_ASSETS[(idx + 1) % CONVERTIBLE_ASSETS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookups() {
        assert!(is_supported("BTC"));
        assert!(!is_supported("DOGE"));
        assert_eq!(display_name("BAT"), "Basic Attention Token");
        assert_eq!(display_name("DOGE"), "DOGE");
    }

    #[test]
    fn convert_targets_exclude_source() {
        let targets = convert_targets("BTC");
        assert!(!targets.contains(&"BTC"));
        assert!(targets.contains(&"BNB"));
    }

    #[test]
    fn next_convertible_cycles() {
        let mut seen = vec!["BTC"];
        let mut cur = "BTC";
        for _ in 0..CONVERTIBLE_ASSETS.len() - 1 {
            cur = next_convertible(cur);
            assert!(!seen.contains(&cur));
            seen.push(cur);
        }
        assert_eq!(next_convertible(cur), "BTC");
    }
}
