use async_trait::async_trait;
use tracing::info;

use crate::constants::CURRENCY;
use crate::error::{AppError, Result};
use crate::models::pricing::CoinAmount;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSpec {
    pub name: String,
    pub description: String,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSpec {
    pub product_id: String,
    /// Minor currency units (cents).
    pub unit_amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSpec {
    pub price_id: String,
    pub quantity: u32,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Returns the new product's id.
    async fn create_product(&self, spec: &ProductSpec) -> Result<String>;
    /// Returns the new price's id.
    async fn create_price(&self, spec: &PriceSpec) -> Result<String>;
    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession>;
}

/// Dollars to cents, rounding to the nearest cent.
pub fn to_minor_units(price: f64) -> Result<i64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Other(anyhow::anyhow!("price {price} cannot be charged")));
    }
    Ok((price * 100.0).round() as i64)
}

/// Creates a one-off product, a price for it and a hosted checkout session.
/// Nothing is retried; the first provider error is returned.
pub async fn create_coin_checkout(
    provider: &dyn CheckoutProvider,
    coins: CoinAmount,
    price: f64,
    origin: &str,
) -> Result<CheckoutSession> {
    let unit_amount = to_minor_units(price)?;
    let origin = origin.trim_end_matches('/');

    let product_id = provider
        .create_product(&ProductSpec {
            name: format!("{coins} Game Coins"),
            description: format!("Purchase of {coins} coins for ShatterRealms"),
            metadata: vec![
                ("coins".into(), coins.to_string()),
                ("type".into(), "dynamic_coin_purchase".into()),
            ],
        })
        .await?;

    let price_id = provider
        .create_price(&PriceSpec {
            product_id,
            unit_amount,
            currency: CURRENCY.into(),
        })
        .await?;

    let session = provider
        .create_session(&SessionSpec {
            price_id,
            quantity: 1,
            success_url: format!("{origin}?success=true&coins={coins}"),
            cancel_url: format!("{origin}?canceled=true"),
            metadata: vec![("coins".into(), coins.to_string())],
        })
        .await?;

    info!(coins = coins.get(), unit_amount, session = %session.id, "checkout session created");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_units_round_to_nearest_cent() {
        assert_eq!(to_minor_units(9.0).unwrap(), 900);
        assert_eq!(to_minor_units(0.5).unwrap(), 50);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(13.5).unwrap(), 1350);
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-1.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
    }
}
