//! Tool argument records
//!
//! Each record is the declared input shape of one tool. Deserialization checks field
//! presence and types, `Validate` checks value ranges, and the same attributes drive the
//! JSON Schema advertised through `tools/list`.
//!
//! Optional fields may be omitted but not sent as `null`. Integer fields accept any JSON
//! number without a fractional part, so `10000.0` reads as `10000`.

use schemars::JsonSchema;
use serde::de::{Deserializer, Error as _, Unexpected};
use serde::Deserialize;
use serde_json::Number;
use validator::Validate;

/// Device a customer uses to receive one-time passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    PaperCard,
    HardwareToken,
    App,
    Sms,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpDeviceCheckArgs {
    /// User ID
    pub user_id: String,
    /// Declared OTP device type, when known
    #[serde(default, deserialize_with = "present")]
    pub device_type: Option<DeviceType>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreTransferPrepArgs {
    /// User ID
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTransferArgs {
    pub user_id: String,
    /// Source account ID (e.g. ACC-001)
    pub from_account_id: String,
    /// Registered payee ID (e.g. P-0001)
    pub to_payee_id: String,
    /// Amount in JPY. Defaults to 50000 when omitted.
    #[serde(
        rename = "amountJPY",
        default,
        deserialize_with = "present_whole_number"
    )]
    #[validate(range(min = 1))]
    pub amount_jpy: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThreatmetrixRiskArgs {
    pub user_id: String,
    #[serde(default, deserialize_with = "present")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ObtainSecondPasswordArgs {
    pub user_id: String,
    #[serde(default, deserialize_with = "present")]
    pub auth_request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTransferArgs {
    pub user_id: String,
    pub from_account_id: String,
    pub to_payee_id: String,
    /// Amount in JPY
    #[serde(rename = "amountJPY", deserialize_with = "whole_number")]
    #[validate(range(min = 1))]
    pub amount_jpy: i64,
    #[serde(default, deserialize_with = "present")]
    pub second_password_token: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub otp_code: Option<String>,
    /// Accepted but not deduplicated
    #[serde(default, deserialize_with = "present")]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHighRiskAuthStatusArgs {
    pub user_id: String,
    /// High-risk case ID
    pub case_id: String,
    /// Result of the email OTP check
    pub otp_verified: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TermDepositPrepArgs {
    pub user_id: String,
    pub from_account_id: String,
    #[serde(rename = "amountJPY", deserialize_with = "whole_number")]
    #[validate(range(min = 1))]
    pub amount_jpy: i64,
    #[serde(default, deserialize_with = "present_whole_number")]
    #[validate(range(min = 1))]
    pub term_months: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    pub product_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyTermDepositArgs {
    pub user_id: String,
    pub from_account_id: String,
    #[serde(rename = "amountJPY", deserialize_with = "whole_number")]
    #[validate(range(min = 1))]
    pub amount_jpy: i64,
    #[serde(deserialize_with = "whole_number")]
    #[validate(range(min = 1))]
    pub term_months: i64,
    #[serde(default, deserialize_with = "present")]
    pub product_code: Option<String>,
    /// Maturity handling. Overrides the product default when present.
    #[serde(default, deserialize_with = "present")]
    pub handling: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub idempotency_key: Option<String>,
}

/// Optional field that, when sent, must hold a value. Absence comes from `default`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    number_to_i64(&number)
        .ok_or_else(|| D::Error::invalid_value(unexpected(&number), &"a whole number"))
}

fn present_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    whole_number(deserializer).map(Some)
}

fn number_to_i64(number: &Number) -> Option<i64> {
    if let Some(n) = number.as_i64() {
        return Some(n);
    }

    // 2^63 as f64; anything at or above it does not fit
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    number
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT)
        .map(|f| f as i64)
}

fn unexpected(number: &Number) -> Unexpected<'static> {
    match (number.as_u64(), number.as_f64()) {
        (Some(n), _) => Unexpected::Unsigned(n),
        (None, Some(f)) => Unexpected::Float(f),
        (None, None) => Unexpected::Other("number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_fields() {
        let args: ExecuteTransferArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": 10000,
            "idempotencyKey": "k-1"
        }))
        .unwrap();
        assert_eq!(args.amount_jpy, 10000);
        assert_eq!(args.idempotency_key.as_deref(), Some("k-1"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_negative_amount_fails_validation() {
        let args: ExecuteTransferArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": -5
        }))
        .unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_fractional_amount_rejected() {
        let result: Result<ExecuteTransferArgs, _> = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": 10.5
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_whole_float_amount_accepted() {
        let args: ExecuteTransferArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": 10000.0
        }))
        .unwrap();
        assert_eq!(args.amount_jpy, 10000);

        let args: ApplyTermDepositArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "amountJPY": 300000,
            "termMonths": 12.0
        }))
        .unwrap();
        assert_eq!(args.term_months, 12);

        let args: ReviewTransferArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": 2.5e4
        }))
        .unwrap();
        assert_eq!(args.amount_jpy, Some(25000));
    }

    #[test]
    fn test_out_of_range_amount_rejected() {
        let result: Result<ExecuteTransferArgs, _> = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": 1e300
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_as_string_rejected() {
        let result: Result<TermDepositPrepArgs, _> = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "amountJPY": "300000"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_omitted_optionals_are_none() {
        let args: TermDepositPrepArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "amountJPY": 300000
        }))
        .unwrap();
        assert_eq!(args.term_months, None);
        assert_eq!(args.product_code, None);

        let args: PreTransferPrepArgs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(args.user_id, None);
    }

    #[test]
    fn test_null_optionals_rejected() {
        let session: Result<ThreatmetrixRiskArgs, _> =
            serde_json::from_value(json!({"userId": "u-1", "sessionId": null}));
        assert!(session.is_err());

        let amount: Result<ReviewTransferArgs, _> = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "toPayeeId": "P-0001",
            "amountJPY": null
        }));
        assert!(amount.is_err());

        let device: Result<OtpDeviceCheckArgs, _> =
            serde_json::from_value(json!({"userId": "u-1", "deviceType": null}));
        assert!(device.is_err());
    }

    #[test]
    fn test_optional_term_months_validated_when_present() {
        let args: TermDepositPrepArgs = serde_json::from_value(json!({
            "userId": "u-1",
            "fromAccountId": "ACC-001",
            "amountJPY": 300000,
            "termMonths": 0
        }))
        .unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_device_type_values() {
        let args: OtpDeviceCheckArgs =
            serde_json::from_value(json!({"userId": "u-1", "deviceType": "paper_card"})).unwrap();
        assert_eq!(args.device_type, Some(DeviceType::PaperCard));

        let bad: Result<OtpDeviceCheckArgs, _> =
            serde_json::from_value(json!({"userId": "u-1", "deviceType": "carrier_pigeon"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_otp_verified_must_be_bool() {
        let result: Result<UpdateHighRiskAuthStatusArgs, _> = serde_json::from_value(json!({
            "userId": "u-1",
            "caseId": "CASE-1",
            "otpVerified": "yes"
        }));
        assert!(result.is_err());
    }
}
