//! Accounting command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use lendops_api::{
    ApiClient, FloatAccount, JournalEntry, LedgerAccount, NewJournalEntry, TrialBalance,
    TrialBalanceLine,
};

use crate::cli::{AccountingArgs, AccountingCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct JournalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&JournalEntry> for JournalRow {
    fn from(e: &JournalEntry) -> Self {
        Self {
            id: e.id.clone(),
            date: e.entry_date.to_string(),
            reference: e.reference.clone().unwrap_or_default(),
            description: e.description.clone().unwrap_or_default(),
            amount: output::money(e.total_debit()),
            status: e.status.as_deref().map(output::status).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl From<&LedgerAccount> for AccountRow {
    fn from(a: &LedgerAccount) -> Self {
        Self {
            code: a.code.clone(),
            name: a.name.clone(),
            account_type: a.account_type.clone().unwrap_or_default(),
            parent: a.parent_code.clone().unwrap_or_default(),
            balance: output::opt_money(a.balance),
        }
    }
}

#[derive(Tabled)]
struct TrialBalanceRow {
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Debit")]
    debit: String,
    #[tabled(rename = "Credit")]
    credit: String,
}

impl From<&TrialBalanceLine> for TrialBalanceRow {
    fn from(l: &TrialBalanceLine) -> Self {
        Self {
            account: l.account_code.clone(),
            name: l.account_name.clone().unwrap_or_default(),
            debit: output::money(l.debit),
            credit: output::money(l.credit),
        }
    }
}

#[derive(Tabled)]
struct FloatRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "")]
    flag: String,
}

impl From<&FloatAccount> for FloatRow {
    fn from(f: &FloatAccount) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            provider: f.provider.clone().unwrap_or_default(),
            balance: output::money(f.balance),
            threshold: output::opt_money(f.low_balance_threshold),
            flag: if f.is_below_threshold() {
                output::status("LOW")
            } else {
                String::new()
            },
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn entry_detail(e: &JournalEntry) -> String {
    let mut out = output::detail(&[
        ("ID", e.id.clone()),
        ("Number", e.entry_number.clone().unwrap_or_default()),
        ("Date", e.entry_date.to_string()),
        ("Status", e.status.as_deref().map(output::status).unwrap_or_default()),
        ("Reference", e.reference.clone().unwrap_or_default()),
        ("Description", e.description.clone().unwrap_or_default()),
        ("Created by", e.created_by.clone().unwrap_or_default()),
    ]);
    for line in &e.lines {
        let _ = write!(
            out,
            "\n  {:<10} {:>14} {:>14}  {}",
            line.account_code,
            output::opt_money(line.debit),
            output::opt_money(line.credit),
            line.narration
                .as_deref()
                .or(line.account_name.as_deref())
                .unwrap_or_default(),
        );
    }
    out
}

fn trial_balance_table(tb: &TrialBalance) -> String {
    let table = output::render_list(
        OutputFormat::Table,
        &tb.lines,
        |l| TrialBalanceRow::from(l),
        |l| l.account_code.clone(),
    );
    let debit = tb
        .total_debit
        .unwrap_or_else(|| tb.lines.iter().map(|l| l.debit).sum());
    let credit = tb
        .total_credit
        .unwrap_or_else(|| tb.lines.iter().map(|l| l.credit).sum());
    let verdict = if tb.is_balanced() {
        output::status("BALANCED")
    } else {
        output::status("OUT_OF_BALANCE")
    };
    let as_of = tb.as_of.map(|d| format!(" as of {d}")).unwrap_or_default();
    format!(
        "{table}\nTotals{as_of}: debit {} / credit {}  {verdict}",
        output::money(debit),
        output::money(credit)
    )
}

fn print_entry(entry: &JournalEntry, global: &GlobalOpts) {
    let out = output::render_single(global.format(), entry, entry_detail, |e| e.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    client: &ApiClient,
    args: AccountingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountingCommand::Journal { page, range } => {
            let entries = client
                .list_journal_entries(util::page_request(page), util::date_range(&range)?)
                .await?;
            let out = output::render_page(
                global.format(),
                &entries,
                |e| JournalRow::from(e),
                |e| e.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountingCommand::Entry { id } => {
            let entry = client.get_journal_entry(&id).await?;
            print_entry(&entry, global);
            Ok(())
        }

        AccountingCommand::Post(payload) => {
            let new: NewJournalEntry = util::read_json_file(&payload.from_file)?;
            let entry = client.post_journal_entry(&new).await?;
            output::print_done(&format!("Journal entry {} posted", entry.id), global.quiet);
            print_entry(&entry, global);
            Ok(())
        }

        AccountingCommand::Reverse { id, reason } => {
            if !util::confirm(
                &format!("Reverse journal entry {id}? A contra entry will be posted."),
                "accounting reverse",
                global.yes,
            )? {
                return Ok(());
            }
            let reversal = client.reverse_journal_entry(&id, &reason).await?;
            output::print_done(
                &format!("Journal entry {id} reversed by {}", reversal.id),
                global.quiet,
            );
            print_entry(&reversal, global);
            Ok(())
        }

        AccountingCommand::Accounts => {
            let accounts = client.list_ledger_accounts().await?;
            let out = output::render_list(
                global.format(),
                &accounts,
                |a| AccountRow::from(a),
                |a| a.code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountingCommand::TrialBalance { as_of } => {
            let as_of = util::parse_opt_date("as-of", as_of.as_deref())?;
            let tb = client.trial_balance(as_of).await?;
            let out = output::render_single(global.format(), &tb, trial_balance_table, |tb| {
                tb.lines
                    .iter()
                    .map(|l| l.account_code.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountingCommand::Floats => {
            let floats = client.list_float_accounts().await?;
            let out = output::render_list(
                global.format(),
                &floats,
                |f| FloatRow::from(f),
                |f| f.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountingCommand::TopUp {
            id,
            amount,
            reference,
        } => {
            let amount = util::parse_amount("amount", &amount)?;
            let float = client.top_up_float_account(&id, amount, &reference).await?;
            output::print_done(
                &format!(
                    "Float {} topped up, balance now {}",
                    float.name,
                    output::money(float.balance)
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
