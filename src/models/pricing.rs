use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::models::lenient;

/// Raw body of `POST /pricing`. Validation happens in `services::pricing`.
#[derive(Deserialize, Debug, Default)]
pub struct CoinPurchaseRequest {
    #[serde(default)]
    pub coins: Option<serde_json::Value>,
}

/// A validated coin count. Whole counts print and serialize as integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CoinAmount(f64);

impl CoinAmount {
    pub(crate) fn new(coins: f64) -> Self {
        Self(coins)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    fn whole(self) -> Option<u64> {
        (self.0.fract() == 0.0).then_some(self.0 as u64)
    }
}

impl fmt::Display for CoinAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.whole() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for CoinAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.whole() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Dollars.
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub reasoning: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CoinPurchaseResponse {
    pub url: String,
    pub coins: CoinAmount,
    pub price: f64,
    pub reasoning: String,
}
