//! Reporting command handlers.

use rust_decimal::{Decimal, RoundingStrategy};
use tabled::Tabled;

use lendops_api::{ApiClient, DashboardSummary, DisbursementSummary, ParBucket, PortfolioAtRisk};

use crate::cli::{GlobalOpts, OutputFormat, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ParRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Loans")]
    loans: u64,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Ratio")]
    ratio: String,
}

impl From<&ParBucket> for ParRow {
    fn from(b: &ParBucket) -> Self {
        Self {
            band: b.label.clone(),
            days: match b.days_to {
                Some(to) => format!("{}-{to}", b.days_from),
                None => format!("{}+", b.days_from),
            },
            loans: b.loan_count,
            outstanding: output::money(b.outstanding),
            ratio: b.ratio.map(percent).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DisbursementRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&DisbursementSummary> for DisbursementRow {
    fn from(d: &DisbursementSummary) -> Self {
        Self {
            date: d.date.to_string(),
            product: d.product_id.clone().unwrap_or_default(),
            count: d.count,
            amount: output::money(d.amount),
        }
    }
}

/// Ratios arrive as fractions (0.052); show them as percentages.
fn percent(ratio: Decimal) -> String {
    let pct = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct}%")
}

fn dashboard_detail(d: &DashboardSummary) -> String {
    output::detail(&[
        ("Portfolio", output::money(d.total_portfolio)),
        ("Active loans", d.active_loans.to_string()),
        ("Disbursed this month", output::money(d.disbursed_this_month)),
        ("Collected this month", output::money(d.collected_this_month)),
        ("PAR", d.portfolio_at_risk_ratio.map(percent).unwrap_or_default()),
        ("Pending applications", d.pending_applications.to_string()),
        ("Open collection cases", d.open_collection_cases.to_string()),
        ("Open compliance alerts", d.open_compliance_alerts.to_string()),
    ])
}

fn par_table(par: &PortfolioAtRisk) -> String {
    let table = output::render_list(
        OutputFormat::Table,
        &par.buckets,
        |b| ParRow::from(b),
        |b| b.label.clone(),
    );
    let as_of = par.as_of.map(|d| format!(" as of {d}")).unwrap_or_default();
    format!(
        "{table}\nOutstanding{as_of}: {}",
        output::money(par.total_outstanding)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::Dashboard => {
            let summary = client.dashboard_summary().await?;
            let out = output::render_single(global.format(), &summary, dashboard_detail, |d| {
                output::money(d.total_portfolio)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Par { as_of } => {
            let as_of = util::parse_opt_date("as-of", as_of.as_deref())?;
            let par = client.portfolio_at_risk(as_of).await?;
            let out = output::render_single(global.format(), &par, par_table, |p| {
                p.buckets
                    .iter()
                    .map(|b| b.label.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Disbursements { range } => {
            let rows = client.disbursement_report(util::date_range(&range)?).await?;
            let out = match global.format() {
                OutputFormat::Table => {
                    let table = output::render_list(
                        OutputFormat::Table,
                        &rows,
                        |d| DisbursementRow::from(d),
                        |d| d.date.to_string(),
                    );
                    let count: u64 = rows.iter().map(|d| d.count).sum();
                    let amount: Decimal = rows.iter().map(|d| d.amount).sum();
                    format!("{table}\nTotal: {count} loans, {}", output::money(amount))
                }
                format => output::render_list(
                    format,
                    &rows,
                    |d| DisbursementRow::from(d),
                    |d| d.date.to_string(),
                ),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
