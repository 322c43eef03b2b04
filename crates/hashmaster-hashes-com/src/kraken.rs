//! USD conversion through Kraken's public ticker

use std::cell::RefCell;
use std::collections::HashMap;

use hashmaster_core::{ApiError, get_text};
use serde_json::Value;

pub const DEFAULT_URL: &str = "https://api.kraken.com";

const SERVICE: &str = "Kraken";

/// Payout currencies on Hashes.com
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Btc,
    Xmr,
    Ltc,
    /// Site credits, not convertible
    Credits,
}

impl Currency {
    /// Ticker symbol used in the query (`pair={symbol}usd`)
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Btc => "btc",
            Self::Xmr => "xmr",
            Self::Ltc => "ltc",
            Self::Credits => "credits",
        }
    }

    /// Key of the pair in the ticker result
    fn pair(self) -> Option<&'static str> {
        match self {
            Self::Btc => Some("XXBTZUSD"),
            Self::Xmr => Some("XXMRZUSD"),
            Self::Ltc => Some("XLTCZUSD"),
            Self::Credits => None,
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "btc" => Ok(Self::Btc),
            "xmr" => Ok(Self::Xmr),
            "ltc" => Ok(Self::Ltc),
            "credits" => Ok(Self::Credits),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

/// Converts crypto amounts to USD at Kraken's current ask price.
///
/// Each currency's price is fetched at most once per converter.
#[derive(Debug)]
pub struct Kraken {
    base_url: String,
    prices: RefCell<HashMap<Currency, f64>>,
}

impl Kraken {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prices: RefCell::new(HashMap::new()),
        }
    }

    /// Current ask price of one unit in USD; `None` for credits
    pub fn price(&self, currency: Currency) -> Result<Option<f64>, ApiError> {
        let Some(pair) = currency.pair() else {
            return Ok(None);
        };
        if let Some(price) = self.prices.borrow().get(&currency) {
            return Ok(Some(*price));
        }
        let url = format!(
            "{}/0/public/Ticker?pair={}usd",
            self.base_url,
            currency.symbol()
        );
        let price = ask_price(&get_text(&url, &[])?, pair)?;
        log::debug!("{SERVICE} {pair} ask: {price}");
        self.prices.borrow_mut().insert(currency, price);
        Ok(Some(price))
    }

    /// `value` in USD; `None` for credits
    pub fn to_usd(&self, value: f64, currency: Currency) -> Result<Option<f64>, ApiError> {
        Ok(self.price(currency)?.map(|price| value * price))
    }

    /// `to_usd` rendered as `$0.000`, or `N/A` for credits
    pub fn to_usd_string(&self, value: f64, currency: Currency) -> Result<String, ApiError> {
        Ok(format_usd(self.to_usd(value, currency)?))
    }
}

impl Default for Kraken {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// `$` with three decimals, `N/A` when there is no conversion
pub fn format_usd(usd: Option<f64>) -> String {
    match usd {
        Some(v) => format!("${v:.3}"),
        None => "N/A".to_string(),
    }
}

/// `result.{pair}.a[0]` of a ticker response
fn ask_price(body: &str, pair: &str) -> Result<f64, ApiError> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(errors) = value.get("error").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiError::rejected(SERVICE, message));
        }
    }
    let ask = value
        .pointer(&format!("/result/{pair}/a/0"))
        .ok_or_else(|| ApiError::Decode(format!("ticker has no ask price for {pair}")))?;
    match ask {
        Value::String(s) => s
            .parse()
            .map_err(|_| ApiError::Decode(format!("invalid {pair} price: {s:?}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ApiError::Decode(format!("invalid {pair} price: {n}"))),
        other => Err(ApiError::Decode(format!("invalid {pair} price: {other}"))),
    }
}
