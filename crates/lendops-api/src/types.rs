//! Response and request records for the platform services.
//!
//! Records mirror the services' JSON (camelCase). Validation lives
//! server-side, so most fields are optional and every response record keeps
//! unknown fields in `extra` so they survive re-serialization.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catch-all for fields not modeled explicitly.
pub type Extra = HashMap<String, Value>;

// ── Auth ─────────────────────────────────────────────────────────────

/// Issued by `POST auth/login` and `POST auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: SecretString,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub branch_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Loans ────────────────────────────────────────────────────────────

/// Lifecycle state reported by the loans service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Disbursed,
    Active,
    InArrears,
    Closed,
    WrittenOff,
    /// A state this client does not know yet.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,
    pub loan_number: Option<String>,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub principal: Decimal,
    pub interest_rate: Option<Decimal>,
    pub term_months: Option<u32>,
    pub outstanding_balance: Option<Decimal>,
    pub currency: Option<String>,
    pub status: LoanStatus,
    pub application_date: Option<NaiveDate>,
    pub disbursement_date: Option<NaiveDate>,
    pub maturity_date: Option<NaiveDate>,
    pub days_in_arrears: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST loans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanApplication {
    pub customer_id: String,
    pub product_id: String,
    pub principal: Decimal,
    pub term_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Optional filters for `list_loans`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanFilter {
    pub status: Option<LoanStatus>,
    pub customer_id: Option<String>,
    pub branch_id: Option<String>,
}

/// Body for `POST loans/{id}/disburse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementRequest {
    /// Partial disbursement amount; the full principal when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One row of a repayment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub installment_number: u32,
    pub due_date: NaiveDate,
    pub principal_due: Decimal,
    pub interest_due: Decimal,
    pub fees_due: Option<Decimal>,
    pub total_due: Decimal,
    pub amount_paid: Option<Decimal>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repayment {
    pub id: Option<String>,
    pub loan_id: Option<String>,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub reference: Option<String>,
    pub channel: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST loans/{id}/repayments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepayment {
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub kyc_status: Option<String>,
    pub branch_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body for `POST customers` and `PUT customers/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: Option<String>,
    pub name: String,
    pub product_type: Option<String>,
    pub currency: Option<String>,
    pub min_principal: Option<Decimal>,
    pub max_principal: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    /// e.g. `FLAT` or `DECLINING_BALANCE`.
    pub interest_method: Option<String>,
    pub min_term_months: Option<u32>,
    pub max_term_months: Option<u32>,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST products` and `PUT products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_principal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_principal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_term_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_term_months: Option<u32>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Accounting ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub entry_number: Option<String>,
    pub entry_date: NaiveDate,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// e.g. `POSTED` or `REVERSED`.
    pub status: Option<String>,
    #[serde(default)]
    pub lines: Vec<JournalLine>,
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl JournalEntry {
    /// Sum of debit amounts across all lines.
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().filter_map(|l| l.debit).sum()
    }
}

/// One leg of a journal entry. Exactly one of `debit`/`credit` is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLine {
    pub account_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
}

/// Body for `POST journal-entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    pub entry_date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub lines: Vec<JournalLine>,
}

/// Inclusive date window sent as `from`/`to`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub code: String,
    pub name: String,
    /// `ASSET`, `LIABILITY`, `EQUITY`, `INCOME` or `EXPENSE`.
    pub account_type: Option<String>,
    pub parent_code: Option<String>,
    pub balance: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub as_of: Option<NaiveDate>,
    #[serde(default)]
    pub lines: Vec<TrialBalanceLine>,
    pub total_debit: Option<Decimal>,
    pub total_credit: Option<Decimal>,
}

impl TrialBalance {
    /// Debits equal credits, using the service totals when provided.
    pub fn is_balanced(&self) -> bool {
        let debit = self
            .total_debit
            .unwrap_or_else(|| self.lines.iter().map(|l| l.debit).sum());
        let credit = self
            .total_credit
            .unwrap_or_else(|| self.lines.iter().map(|l| l.credit).sum());
        debit == credit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    pub account_code: String,
    pub account_name: Option<String>,
    #[serde(default)]
    pub debit: Decimal,
    #[serde(default)]
    pub credit: Decimal,
}

/// Mobile-money or bank float used for disbursements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatAccount {
    pub id: String,
    pub name: String,
    pub provider: Option<String>,
    pub account_number: Option<String>,
    pub balance: Decimal,
    pub currency: Option<String>,
    pub low_balance_threshold: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FloatAccount {
    pub fn is_below_threshold(&self) -> bool {
        self.low_balance_threshold
            .is_some_and(|threshold| self.balance < threshold)
    }
}

// ── Collections ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCase {
    pub id: String,
    pub loan_id: String,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub amount_overdue: Decimal,
    #[serde(default)]
    pub days_past_due: u32,
    pub status: Option<String>,
    /// Arrears bucket, e.g. `1-30`.
    pub bucket: Option<String>,
    pub assigned_agent_id: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub status: Option<String>,
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAction {
    pub id: Option<String>,
    pub case_id: Option<String>,
    /// e.g. `CALL`, `SMS`, `VISIT`, `PROMISE_TO_PAY`.
    pub action_type: String,
    pub notes: Option<String>,
    pub promised_amount: Option<Decimal>,
    pub promised_date: Option<NaiveDate>,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST cases/{id}/actions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectionAction {
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promised_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promised_date: Option<NaiveDate>,
}

// ── Compliance ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAlert {
    pub id: String,
    pub alert_type: String,
    pub severity: String,
    pub status: String,
    pub customer_id: Option<String>,
    pub loan_id: Option<String>,
    pub description: Option<String>,
    pub raised_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertFilter {
    pub severity: Option<String>,
    pub status: Option<String>,
}

/// Body for `PATCH alerts/{id}/resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResolution {
    pub resolution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub customer_id: String,
    pub risk_score: Option<Decimal>,
    pub risk_level: Option<String>,
    #[serde(default)]
    pub factors: Vec<String>,
    pub last_assessed: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub customer_id: String,
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub lists_checked: Vec<String>,
    #[serde(default)]
    pub matches: Vec<Value>,
    pub screened_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Reporting ────────────────────────────────────────────────────────

/// Headline figures for the operations dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_portfolio: Decimal,
    pub active_loans: u64,
    pub disbursed_this_month: Decimal,
    pub collected_this_month: Decimal,
    pub portfolio_at_risk_ratio: Option<Decimal>,
    pub pending_applications: u64,
    pub open_collection_cases: u64,
    pub open_compliance_alerts: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAtRisk {
    pub as_of: Option<NaiveDate>,
    pub total_outstanding: Decimal,
    #[serde(default)]
    pub buckets: Vec<ParBucket>,
}

/// Outstanding balance in one days-past-due band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParBucket {
    pub label: String,
    pub days_from: u32,
    pub days_to: Option<u32>,
    pub outstanding: Decimal,
    #[serde(default)]
    pub loan_count: u64,
    pub ratio: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursementSummary {
    pub date: NaiveDate,
    pub count: u64,
    pub amount: Decimal,
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Notifications ────────────────────────────────────────────────────

/// Delivery settings for one platform event (e.g. `LOAN_DISBURSED`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub event_type: String,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTemplate {
    pub id: String,
    pub name: String,
    pub channel: String,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Media ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub category: Option<String>,
    pub reference_id: Option<String>,
    pub url: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A file to send to `POST media/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    /// Guessed from `file_name` when unset, falling back to
    /// `application/octet-stream`.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// e.g. `KYC`, `LOAN_AGREEMENT`, `COLLATERAL`.
    pub category: String,
    /// The customer, loan or case the file belongs to.
    pub reference_id: String,
}

// ── Organization ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// `MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_year_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Absent when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_true() -> bool {
    true
}
