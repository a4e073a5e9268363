use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::checkout::{CheckoutProvider, CheckoutSession, PriceSpec, ProductSpec, SessionSpec};

/// Minimal Stripe REST client covering the three calls a one-off checkout needs.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: Secret<String>,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl StripeClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let secret_key = config
            .stripe_secret_key
            .clone()
            .ok_or_else(|| AppError::Config("Missing STRIPE_SECRET_KEY".into()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base: config.stripe_api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.api_base, path);
        debug!(%url, "stripe request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "stripe transport error");
                AppError::Upstream(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<StripeErrorBody>(&text)
                .map(|b| {
                    format!(
                        "{}: {}",
                        b.error.kind.unwrap_or_else(|| "unknown".into()),
                        b.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or(text);
            error!(%url, %status, %detail, "stripe api error");
            return Err(AppError::Upstream(format!("stripe {status}: {detail}")));
        }

        response.json::<T>().await.map_err(|e| {
            error!(%url, error = %e, "stripe response parse error");
            AppError::Upstream(e.to_string())
        })
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_product(&self, spec: &ProductSpec) -> Result<String> {
        let created: Created = self.post_form("products", &product_form(spec)).await?;
        Ok(created.id)
    }

    async fn create_price(&self, spec: &PriceSpec) -> Result<String> {
        let created: Created = self.post_form("prices", &price_form(spec)).await?;
        Ok(created.id)
    }

    async fn create_session(&self, spec: &SessionSpec) -> Result<CheckoutSession> {
        let created: CreatedSession = self
            .post_form("checkout/sessions", &session_form(spec))
            .await?;
        let url = created.url.ok_or_else(|| {
            AppError::Upstream(format!("checkout session {} has no url", created.id))
        })?;
        Ok(CheckoutSession {
            id: created.id,
            url,
        })
    }
}

fn pair(key: impl Into<String>, value: impl ToString) -> (String, String) {
    (key.into(), value.to_string())
}

fn metadata_pairs<'a>(
    metadata: &'a [(String, String)],
) -> impl Iterator<Item = (String, String)> + 'a {
    metadata
        .iter()
        .map(|(k, v)| pair(format!("metadata[{k}]"), v))
}

fn product_form(spec: &ProductSpec) -> Vec<(String, String)> {
    let mut form = vec![
        pair("name", &spec.name),
        pair("description", &spec.description),
        pair("active", true),
    ];
    form.extend(metadata_pairs(&spec.metadata));
    form
}

fn price_form(spec: &PriceSpec) -> Vec<(String, String)> {
    vec![
        pair("product", &spec.product_id),
        pair("unit_amount", spec.unit_amount),
        pair("currency", &spec.currency),
    ]
}

fn session_form(spec: &SessionSpec) -> Vec<(String, String)> {
    let mut form = vec![
        pair("payment_method_types[0]", "card"),
        pair("line_items[0][price]", &spec.price_id),
        pair("line_items[0][quantity]", spec.quantity),
        pair("mode", "payment"),
        pair("success_url", &spec.success_url),
        pair("cancel_url", &spec.cancel_url),
    ];
    form.extend(metadata_pairs(&spec.metadata));
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn product_form_flattens_metadata() {
        let spec = ProductSpec {
            name: "1000 Game Coins".into(),
            description: "Purchase of 1000 coins for ShatterRealms".into(),
            metadata: vec![
                ("coins".into(), "1000".into()),
                ("type".into(), "dynamic_coin_purchase".into()),
            ],
        };
        let form = product_form(&spec);
        assert_eq!(get(&form, "name"), Some("1000 Game Coins"));
        assert_eq!(get(&form, "active"), Some("true"));
        assert_eq!(get(&form, "metadata[coins]"), Some("1000"));
        assert_eq!(get(&form, "metadata[type]"), Some("dynamic_coin_purchase"));
    }

    #[test]
    fn session_form_has_single_card_line_item() {
        let spec = SessionSpec {
            price_id: "price_123".into(),
            quantity: 1,
            success_url: "https://game.example?success=true&coins=500".into(),
            cancel_url: "https://game.example?canceled=true".into(),
            metadata: vec![("coins".into(), "500".into())],
        };
        let form = session_form(&spec);
        assert_eq!(get(&form, "payment_method_types[0]"), Some("card"));
        assert_eq!(get(&form, "line_items[0][price]"), Some("price_123"));
        assert_eq!(get(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(get(&form, "mode"), Some("payment"));
        assert_eq!(get(&form, "metadata[coins]"), Some("500"));
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let err = StripeClient::from_config(&Config::default()).err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }
}
