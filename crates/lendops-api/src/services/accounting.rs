// Accounting service endpoints
//
// Journal entries, chart of accounts, trial balance and disbursement float
// accounts. Posting and reversal are performed by the ledger; this client
// only submits them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::{Page, PageRequest};
use crate::types::{
    DateRange, FloatAccount, JournalEntry, LedgerAccount, NewJournalEntry, TrialBalance,
};

const BASE_PATH: &str = "accounting/api/v1/accounting";

impl ApiClient {
    // ── Journal entries ──────────────────────────────────────────────

    /// `GET journal-entries?page&size[&from][&to]`
    pub async fn list_journal_entries(
        &self,
        page: PageRequest,
        range: DateRange,
    ) -> Result<Page<JournalEntry>, Error> {
        let url = self.endpoint(BASE_PATH, &["journal-entries"])?;
        let mut query = page.to_query();
        query.extend(range.to_query());
        debug!(page = page.page, size = page.size, ?range, "listing journal entries");
        self.get_with_query(url, &query)
            .await
            .into_data("Failed to fetch journal entries")
    }

    /// `GET journal-entries/{id}`
    pub async fn get_journal_entry(&self, entry_id: &str) -> Result<JournalEntry, Error> {
        let url = self.endpoint(BASE_PATH, &["journal-entries", entry_id])?;
        self.get(url).await.into_data("Failed to fetch journal entry")
    }

    /// Submit a manual entry. The ledger rejects unbalanced entries.
    ///
    /// `POST journal-entries`
    pub async fn post_journal_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, Error> {
        let url = self.endpoint(BASE_PATH, &["journal-entries"])?;
        debug!(lines = entry.lines.len(), "posting journal entry");
        self.post(url, Some(entry))
            .await
            .into_data("Failed to post journal entry")
    }

    /// `POST journal-entries/{id}/reverse`
    pub async fn reverse_journal_entry(
        &self,
        entry_id: &str,
        reason: &str,
    ) -> Result<JournalEntry, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            reason: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["journal-entries", entry_id, "reverse"])?;
        debug!(entry_id, reason, "reversing journal entry");
        self.post(url, Some(&Body { reason }))
            .await
            .into_data("Failed to reverse journal entry")
    }

    // ── Ledger ───────────────────────────────────────────────────────

    /// Chart of accounts.
    ///
    /// `GET accounts`
    pub async fn list_ledger_accounts(&self) -> Result<Vec<LedgerAccount>, Error> {
        let url = self.endpoint(BASE_PATH, &["accounts"])?;
        self.get(url)
            .await
            .into_data("Failed to fetch chart of accounts")
    }

    /// `GET trial-balance[?asOf]`
    pub async fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<TrialBalance, Error> {
        let url = self.endpoint(BASE_PATH, &["trial-balance"])?;
        let query: Vec<(&str, String)> = as_of
            .map(|date| ("asOf", date.to_string()))
            .into_iter()
            .collect();
        self.get_with_query(url, &query)
            .await
            .into_data("Failed to fetch trial balance")
    }

    // ── Float accounts ───────────────────────────────────────────────

    /// `GET float-accounts`
    pub async fn list_float_accounts(&self) -> Result<Vec<FloatAccount>, Error> {
        let url = self.endpoint(BASE_PATH, &["float-accounts"])?;
        self.get(url)
            .await
            .into_data("Failed to fetch float accounts")
    }

    /// Record a top-up and return the updated balance.
    ///
    /// `POST float-accounts/{id}/top-ups`
    pub async fn top_up_float_account(
        &self,
        account_id: &str,
        amount: Decimal,
        reference: &str,
    ) -> Result<FloatAccount, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            amount: Decimal,
            reference: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["float-accounts", account_id, "top-ups"])?;
        debug!(account_id, %amount, "topping up float account");
        self.post(url, Some(&Body { amount, reference }))
            .await
            .into_data("Failed to top up float account")
    }
}
