//! Loan command handlers.

use std::str::FromStr;

use tabled::Tabled;

use lendops_api::{
    ApiClient, DisbursementRequest, Installment, Loan, LoanFilter, LoanStatus, NewLoanApplication,
    NewRepayment, Repayment,
};

use crate::cli::{GlobalOpts, LoansArgs, LoansCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LoanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Arrears (days)")]
    arrears: String,
}

impl From<&Loan> for LoanRow {
    fn from(l: &Loan) -> Self {
        Self {
            id: l.id.clone(),
            number: l.loan_number.clone().unwrap_or_default(),
            customer: l.customer_name.clone().unwrap_or_else(|| l.customer_id.clone()),
            principal: output::money(l.principal),
            outstanding: output::opt_money(l.outstanding_balance),
            status: output::status(l.status),
            arrears: output::opt(l.days_in_arrears.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct InstallmentRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Fees")]
    fees: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Installment> for InstallmentRow {
    fn from(i: &Installment) -> Self {
        Self {
            number: i.installment_number,
            due: i.due_date.to_string(),
            principal: output::money(i.principal_due),
            interest: output::money(i.interest_due),
            fees: output::opt_money(i.fees_due),
            total: output::money(i.total_due),
            paid: output::opt_money(i.amount_paid),
            status: i.status.as_deref().map(output::status).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct RepaymentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Reference")]
    reference: String,
}

impl From<&Repayment> for RepaymentRow {
    fn from(r: &Repayment) -> Self {
        Self {
            id: r.id.clone().unwrap_or_default(),
            date: r.payment_date.to_string(),
            amount: output::money(r.amount),
            channel: r.channel.clone().unwrap_or_default(),
            reference: r.reference.clone().unwrap_or_default(),
        }
    }
}

fn loan_detail(l: &Loan) -> String {
    output::detail(&[
        ("ID", l.id.clone()),
        ("Number", l.loan_number.clone().unwrap_or_default()),
        ("Status", output::status(l.status)),
        ("Customer", l.customer_id.clone()),
        ("Customer name", l.customer_name.clone().unwrap_or_default()),
        ("Product", l.product_name.clone().or_else(|| l.product_id.clone()).unwrap_or_default()),
        ("Principal", output::money(l.principal)),
        ("Currency", l.currency.clone().unwrap_or_default()),
        ("Interest rate", output::opt(l.interest_rate.as_ref())),
        ("Term (months)", output::opt(l.term_months.as_ref())),
        ("Outstanding", output::opt_money(l.outstanding_balance)),
        ("Applied", output::opt(l.application_date.as_ref())),
        ("Disbursed", output::opt(l.disbursement_date.as_ref())),
        ("Matures", output::opt(l.maturity_date.as_ref())),
        ("Arrears (days)", output::opt(l.days_in_arrears.as_ref())),
    ])
}

fn parse_status(raw: &str) -> Result<LoanStatus, CliError> {
    match LoanStatus::from_str(raw) {
        Ok(LoanStatus::Unknown) | Err(_) => Err(CliError::Validation {
            field: "status".into(),
            reason: format!(
                "unknown loan status '{raw}' (expected PENDING, APPROVED, REJECTED, DISBURSED, \
                 ACTIVE, IN_ARREARS, CLOSED or WRITTEN_OFF)"
            ),
        }),
        Ok(status) => Ok(status),
    }
}

fn print_loan(loan: &Loan, global: &GlobalOpts) {
    let out = output::render_single(global.format(), loan, loan_detail, |l| l.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(client: &ApiClient, args: LoansArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LoansCommand::List {
            page,
            status,
            customer,
            branch,
        } => {
            let filter = LoanFilter {
                status: status.as_deref().map(parse_status).transpose()?,
                customer_id: customer,
                branch_id: branch,
            };
            let loans = client.list_loans(util::page_request(page), &filter).await?;
            let out = output::render_page(
                global.format(),
                &loans,
                |l| LoanRow::from(l),
                |l| l.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LoansCommand::Get { id } => {
            let loan = client.get_loan(&id).await?;
            print_loan(&loan, global);
            Ok(())
        }

        LoansCommand::Create(payload) => {
            let application: NewLoanApplication = util::read_json_file(&payload.from_file)?;
            let loan = client.create_loan(&application).await?;
            output::print_done(&format!("Loan application {} submitted", loan.id), global.quiet);
            print_loan(&loan, global);
            Ok(())
        }

        LoansCommand::Approve { id, comment } => {
            let loan = client.approve_loan(&id, comment.as_deref()).await?;
            output::print_done(&format!("Loan {id} approved"), global.quiet);
            print_loan(&loan, global);
            Ok(())
        }

        LoansCommand::Reject { id, reason } => {
            if !util::confirm(&format!("Reject loan {id}?"), "loans reject", global.yes)? {
                return Ok(());
            }
            let loan = client.reject_loan(&id, &reason).await?;
            output::print_done(&format!("Loan {id} rejected"), global.quiet);
            print_loan(&loan, global);
            Ok(())
        }

        LoansCommand::Disburse {
            id,
            channel,
            amount,
            reference,
        } => {
            let request = DisbursementRequest {
                amount: util::parse_opt_amount("amount", amount.as_deref())?,
                channel,
                reference,
            };
            let loan = client.disburse_loan(&id, &request).await?;
            output::print_done(&format!("Loan {id} disbursed"), global.quiet);
            print_loan(&loan, global);
            Ok(())
        }

        LoansCommand::Schedule { id } => {
            let schedule = client.loan_schedule(&id).await?;
            let out = output::render_list(
                global.format(),
                &schedule,
                |i| InstallmentRow::from(i),
                |i| i.installment_number.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LoansCommand::Repayments { id } => {
            let repayments = client.list_repayments(&id).await?;
            let out = output::render_list(
                global.format(),
                &repayments,
                |r| RepaymentRow::from(r),
                |r| r.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LoansCommand::Repay {
            id,
            amount,
            date,
            reference,
            channel,
        } => {
            let repayment = NewRepayment {
                amount: util::parse_amount("amount", &amount)?,
                payment_date: match date {
                    Some(ref raw) => util::parse_date("date", raw)?,
                    None => chrono::Local::now().date_naive(),
                },
                reference,
                channel,
            };
            let recorded = client.record_repayment(&id, &repayment).await?;
            output::print_done(
                &format!("Repayment of {} recorded on loan {id}", output::money(recorded.amount)),
                global.quiet,
            );
            let out = output::render_single(
                global.format(),
                &recorded,
                |r| {
                    output::detail(&[
                        ("ID", r.id.clone().unwrap_or_default()),
                        ("Date", r.payment_date.to_string()),
                        ("Amount", output::money(r.amount)),
                        ("Reference", r.reference.clone().unwrap_or_default()),
                    ])
                },
                |r| r.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_accepts_any_case() {
        assert!(matches!(parse_status("in_arrears"), Ok(LoanStatus::InArrears)));
        assert!(matches!(parse_status("ACTIVE"), Ok(LoanStatus::Active)));
        assert!(parse_status("unknown").is_err());
        assert!(parse_status("late").is_err());
    }
}
