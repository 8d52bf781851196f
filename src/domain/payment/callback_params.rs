//! Typed view of the parameters of a Robokassa result callback.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::foundation::{PaymentId, UserId};

use super::CallbackError;

/// Prefix of merchant-defined parameters echoed back by the provider.
pub const CUSTOM_PARAM_PREFIX: &str = "Shp_";

/// Fulfillment type assumed when `Shp_type` is absent.
pub const DEFAULT_DECLARED_TYPE: &str = "subscription";

/// Parsed result-callback parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// `InvId`: the payment being settled.
    pub invoice_id: PaymentId,

    /// `Shp_id`: the paying user.
    pub user_id: UserId,

    /// `OutSum` as sent, scale preserved for signing.
    pub out_sum: Decimal,

    pub signature_value: String,

    /// `Shp_type`, defaulted.
    pub declared_type: String,

    /// `Shp_subscription_type`, if sent.
    pub declared_tier: Option<String>,

    /// `IsTest=1` selects the test-mode merchant password.
    pub is_test: bool,

    /// Every `Shp_*` parameter, sorted by key.
    pub custom_params: BTreeMap<String, String>,
}

impl CallbackParams {
    /// Parses the raw query or form map.
    ///
    /// # Errors
    ///
    /// `MalformedCallback` naming the first missing or unparseable field.
    pub fn from_map(raw: &HashMap<String, String>) -> Result<Self, CallbackError> {
        let invoice_id: PaymentId = required(raw, "InvId")?;
        let user_id: UserId = required(raw, "Shp_id")?;
        let out_sum: Decimal = required(raw, "OutSum")?;

        let signature_value = raw
            .get("SignatureValue")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("SignatureValue"))?;

        let declared_type = raw
            .get("Shp_type")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DECLARED_TYPE.to_string());

        let declared_tier = raw.get("Shp_subscription_type").cloned();

        let is_test = raw.get("IsTest").is_some_and(|v| v.trim() == "1");

        let custom_params = raw
            .iter()
            .filter(|(key, _)| key.starts_with(CUSTOM_PARAM_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            invoice_id,
            user_id,
            out_sum,
            signature_value,
            declared_type,
            declared_tier,
            is_test,
            custom_params,
        })
    }
}

fn missing(field: &str) -> CallbackError {
    CallbackError::MalformedCallback(format!("missing {field}"))
}

fn required<T: FromStr>(raw: &HashMap<String, String>, field: &str) -> Result<T, CallbackError> {
    let value = raw.get(field).ok_or_else(|| missing(field))?;
    value
        .trim()
        .parse()
        .map_err(|_| CallbackError::MalformedCallback(format!("invalid {field}: {value}")))
}
