//! Fixed mock records standing in for backend data
//!
//! Everything here is compiled in. Nothing is created, mutated or destroyed at runtime.

use serde::Serialize;

/// Fixed instant stamped on every response
pub const MOCK_NOW_ISO: &str = "2025-09-24T09:00:00Z";

/// Amount used by `review_transfer` when the caller omits one
pub const DEFAULT_REVIEW_AMOUNT_JPY: i64 = 50_000;

/// Registered transfer payee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payee {
    pub id: &'static str,
    pub nickname: &'static str,
    pub bank: &'static str,
    pub branch: &'static str,
    pub account_type: &'static str,
    pub account_last4: &'static str,
    pub name_kana: &'static str,
}

/// Source account. `balance` is illustrative and never debited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub last4: &'static str,
    pub currency: &'static str,
    pub balance: i64,
}

/// Transfer limits and the estimated fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsAndFees {
    pub per_transaction_limit: i64,
    pub daily_remaining_limit: i64,
    #[serde(rename = "estimatedFeeJPY")]
    pub estimated_fee_jpy: i64,
}

/// Risk tier, serialized with the bank's 低/中/高 labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    #[serde(rename = "低")]
    Low,
    #[serde(rename = "中")]
    Medium,
    #[serde(rename = "高")]
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk: RiskTier,
    pub reason_codes: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub transaction_id: &'static str,
    pub status: &'static str,
    pub booked_at: &'static str,
    pub new_balance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDepositPrecheck {
    pub eligible: bool,
    pub min_amount: i64,
    pub product_code: &'static str,
    pub term_months: i64,
    pub rate_annual_pct: f64,
    pub kyc_risk: RiskTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDepositAcceptance {
    pub term_deposit_id: &'static str,
    pub status: &'static str,
    pub start_date: &'static str,
    pub maturity_date: &'static str,
    pub rate_annual_pct: f64,
    pub handling: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondPasswordGrant {
    pub approved: bool,
    pub method: &'static str,
    pub token: &'static str,
    pub expires_at: &'static str,
}

pub const PAYEES: [Payee; 2] = [
    Payee {
        id: "P-0001",
        nickname: "A社",
        bank: "○○銀行",
        branch: "本店",
        account_type: "普通",
        account_last4: "1234",
        name_kana: "エーシャ",
    },
    Payee {
        id: "P-0002",
        nickname: "B社",
        bank: "△△銀行",
        branch: "渋谷",
        account_type: "普通",
        account_last4: "9876",
        name_kana: "ビーシャ",
    },
];

pub const ACCOUNTS: [Account; 2] = [
    Account {
        id: "ACC-001",
        kind: "普通",
        last4: "3456",
        currency: "JPY",
        balance: 2_345_678,
    },
    Account {
        id: "ACC-002",
        kind: "当座",
        last4: "1122",
        currency: "JPY",
        balance: 520_000,
    },
];

pub const LIMITS_AND_FEES: LimitsAndFees = LimitsAndFees {
    per_transaction_limit: 1_000_000,
    daily_remaining_limit: 900_000,
    estimated_fee_jpy: 330,
};

pub const RISK_MEDIUM: RiskAssessment = RiskAssessment {
    risk: RiskTier::Medium,
    reason_codes: &["DEVICE_TRUST_MODERATE", "VELOCITY_NORMAL"],
};

pub const TRANSFER_OK: TransferResult = TransferResult {
    transaction_id: "TX-000123",
    status: "success",
    booked_at: MOCK_NOW_ISO,
    new_balance: 1_234_567,
};

pub const SECOND_PASSWORD_APPROVED: SecondPasswordGrant = SecondPasswordGrant {
    approved: true,
    method: "app",
    token: "2FA-TOKEN-MOCK",
    expires_at: "2025-12-31T00:00:00Z",
};

pub const TERM_DEPOSIT_PRECHECK: TermDepositPrecheck = TermDepositPrecheck {
    eligible: true,
    min_amount: 100_000,
    product_code: "TD-STD-12M",
    term_months: 12,
    rate_annual_pct: 0.25,
    kyc_risk: RiskTier::Low,
};

pub const TERM_DEPOSIT_ACCEPTED: TermDepositAcceptance = TermDepositAcceptance {
    term_deposit_id: "TD-000789",
    status: "accepted",
    start_date: "2025-09-24",
    maturity_date: "2026-09-24",
    rate_annual_pct: 0.25,
    handling: "利息を普通へ入金",
};

/// Advisory attached to every transfer review
pub const REVIEW_ADVISORY: &str = "問題ありません（モック）";

/// Status reported for high-risk case updates
pub const CASE_UPDATED_STATUS: &str = "updated";
