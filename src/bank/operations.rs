//! Mock bank operations
//!
//! Each operation is a pure function of its validated arguments and the fixture set.

use serde::Serialize;

use crate::bank::fixtures::{
    Account, LimitsAndFees, Payee, RiskAssessment, SecondPasswordGrant, TermDepositPrecheck,
    TransferResult, ACCOUNTS, CASE_UPDATED_STATUS, DEFAULT_REVIEW_AMOUNT_JPY, LIMITS_AND_FEES,
    MOCK_NOW_ISO, PAYEES, REVIEW_ADVISORY, RISK_MEDIUM, SECOND_PASSWORD_APPROVED,
    TERM_DEPOSIT_ACCEPTED, TERM_DEPOSIT_PRECHECK, TRANSFER_OK,
};
use crate::bank::requests::{
    ApplyTermDepositArgs, DeviceType, ExecuteTransferArgs, ObtainSecondPasswordArgs,
    OtpDeviceCheckArgs, PreTransferPrepArgs, ReviewTransferArgs, TermDepositPrepArgs,
    ThreatmetrixRiskArgs, UpdateHighRiskAuthStatusArgs,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpDeviceCheck {
    pub allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreTransferPrep {
    pub generated_at: &'static str,
    pub payees: &'static [Payee],
    pub source_accounts: &'static [Account],
    pub limit_and_fees: LimitsAndFees,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReview {
    pub checked_at: &'static str,
    pub from_account_id: String,
    pub to_payee_id: String,
    #[serde(rename = "amountJPY")]
    pub amount_jpy: i64,
    pub sufficient_balance: bool,
    pub within_limit: bool,
    #[serde(rename = "feeJPY")]
    pub fee_jpy: i64,
    pub advisory: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEvaluation {
    pub evaluated_at: &'static str,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferExecution {
    pub executed_at: &'static str,
    pub from_account_id: String,
    pub to_payee_id: String,
    #[serde(rename = "amountJPY")]
    pub amount_jpy: i64,
    #[serde(flatten)]
    pub result: TransferResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskAuthStatus {
    pub updated_at: &'static str,
    pub case_id: String,
    pub otp_verified: bool,
    pub status: &'static str,
}

/// Term and product the caller asked for, echoed back as given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedTerms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDepositPrepResult {
    pub checked_at: &'static str,
    pub from_account_id: String,
    #[serde(rename = "amountJPY")]
    pub amount_jpy: i64,
    pub requested: RequestedTerms,
    #[serde(flatten)]
    pub precheck: TermDepositPrecheck,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDepositApplication {
    pub applied_at: &'static str,
    pub from_account_id: String,
    #[serde(rename = "amountJPY")]
    pub amount_jpy: i64,
    pub term_months: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub term_deposit_id: &'static str,
    pub status: &'static str,
    pub start_date: &'static str,
    pub maturity_date: &'static str,
    pub rate_annual_pct: f64,
    pub handling: String,
}

/// Whether the customer's OTP device permits transfers. Paper cards do not.
pub fn otp_device_check(args: OtpDeviceCheckArgs) -> OtpDeviceCheck {
    let uses_paper_card = args.device_type == Some(DeviceType::PaperCard)
        || args.user_id.to_lowercase().contains("paper");

    OtpDeviceCheck {
        allowed: !uses_paper_card,
    }
}

/// Payees, source accounts and limits. The user ID does not filter anything.
pub fn pre_transfer_prep(_args: PreTransferPrepArgs) -> PreTransferPrep {
    PreTransferPrep {
        generated_at: MOCK_NOW_ISO,
        payees: &PAYEES,
        source_accounts: &ACCOUNTS,
        limit_and_fees: LIMITS_AND_FEES,
    }
}

pub fn review_transfer(args: ReviewTransferArgs) -> TransferReview {
    let amount = args.amount_jpy.unwrap_or(DEFAULT_REVIEW_AMOUNT_JPY);

    TransferReview {
        checked_at: MOCK_NOW_ISO,
        from_account_id: args.from_account_id,
        to_payee_id: args.to_payee_id,
        amount_jpy: amount,
        sufficient_balance: true,
        within_limit: amount <= LIMITS_AND_FEES.per_transaction_limit,
        fee_jpy: LIMITS_AND_FEES.estimated_fee_jpy,
        advisory: REVIEW_ADVISORY,
    }
}

pub fn threatmetrix_risk(_args: ThreatmetrixRiskArgs) -> RiskEvaluation {
    RiskEvaluation {
        evaluated_at: MOCK_NOW_ISO,
        assessment: RISK_MEDIUM,
    }
}

pub fn obtain_second_password(_args: ObtainSecondPasswordArgs) -> SecondPasswordGrant {
    SECOND_PASSWORD_APPROVED
}

/// Every call yields the same transaction record, idempotency key or not.
pub fn execute_transfer(args: ExecuteTransferArgs) -> TransferExecution {
    TransferExecution {
        executed_at: MOCK_NOW_ISO,
        from_account_id: args.from_account_id,
        to_payee_id: args.to_payee_id,
        amount_jpy: args.amount_jpy,
        result: TRANSFER_OK,
    }
}

pub fn update_high_risk_auth_status(args: UpdateHighRiskAuthStatusArgs) -> HighRiskAuthStatus {
    HighRiskAuthStatus {
        updated_at: MOCK_NOW_ISO,
        case_id: args.case_id,
        otp_verified: args.otp_verified,
        status: CASE_UPDATED_STATUS,
    }
}

/// The fixture's product and term are reported at top level; the caller's go under
/// `requested`. Eligibility does not look at the amount.
pub fn term_deposit_prep(args: TermDepositPrepArgs) -> TermDepositPrepResult {
    TermDepositPrepResult {
        checked_at: MOCK_NOW_ISO,
        from_account_id: args.from_account_id,
        amount_jpy: args.amount_jpy,
        requested: RequestedTerms {
            term_months: args.term_months,
            product_code: args.product_code,
        },
        precheck: TERM_DEPOSIT_PRECHECK,
    }
}

/// The accepted record overlays the caller's fields, then a caller-supplied `handling`
/// takes precedence over the product default.
pub fn apply_term_deposit(args: ApplyTermDepositArgs) -> TermDepositApplication {
    let accepted = TERM_DEPOSIT_ACCEPTED;

    TermDepositApplication {
        applied_at: MOCK_NOW_ISO,
        from_account_id: args.from_account_id,
        amount_jpy: args.amount_jpy,
        term_months: args.term_months,
        product_code: args.product_code,
        term_deposit_id: accepted.term_deposit_id,
        status: accepted.status,
        start_date: accepted.start_date,
        maturity_date: accepted.maturity_date,
        rate_annual_pct: accepted.rate_annual_pct,
        handling: args
            .handling
            .unwrap_or_else(|| accepted.handling.to_string()),
    }
}
