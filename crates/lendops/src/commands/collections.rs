//! Collections command handlers.

use tabled::Tabled;

use lendops_api::{ApiClient, CaseFilter, CollectionAction, CollectionCase, NewCollectionAction};

use crate::cli::{CollectionsArgs, CollectionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Loan")]
    loan: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Overdue")]
    overdue: String,
    #[tabled(rename = "DPD")]
    dpd: u32,
    #[tabled(rename = "Bucket")]
    bucket: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Agent")]
    agent: String,
}

impl From<&CollectionCase> for CaseRow {
    fn from(c: &CollectionCase) -> Self {
        Self {
            id: c.id.clone(),
            loan: c.loan_id.clone(),
            customer: c
                .customer_name
                .clone()
                .or_else(|| c.customer_id.clone())
                .unwrap_or_default(),
            overdue: output::money(c.amount_overdue),
            dpd: c.days_past_due,
            bucket: c.bucket.clone().unwrap_or_default(),
            status: c.status.as_deref().map(output::status).unwrap_or_default(),
            agent: c.assigned_agent_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ActionRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Type")]
    action_type: String,
    #[tabled(rename = "Promised")]
    promised: String,
    #[tabled(rename = "By")]
    by: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

impl From<&CollectionAction> for ActionRow {
    fn from(a: &CollectionAction) -> Self {
        let promised = match (a.promised_amount, a.promised_date) {
            (Some(amount), Some(date)) => format!("{} on {date}", output::money(amount)),
            (Some(amount), None) => output::money(amount),
            (None, Some(date)) => date.to_string(),
            (None, None) => String::new(),
        };
        Self {
            when: a
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            action_type: a.action_type.clone(),
            promised,
            by: a.created_by.clone().unwrap_or_default(),
            notes: a.notes.clone().unwrap_or_default(),
        }
    }
}

fn case_detail(c: &CollectionCase) -> String {
    output::detail(&[
        ("ID", c.id.clone()),
        ("Loan", c.loan_id.clone()),
        ("Customer", c.customer_id.clone().unwrap_or_default()),
        ("Customer name", c.customer_name.clone().unwrap_or_default()),
        ("Overdue", output::money(c.amount_overdue)),
        ("Days past due", c.days_past_due.to_string()),
        ("Bucket", c.bucket.clone().unwrap_or_default()),
        ("Status", c.status.as_deref().map(output::status).unwrap_or_default()),
        ("Agent", c.assigned_agent_id.clone().unwrap_or_default()),
        ("Next action", output::opt(c.next_action_date.as_ref())),
    ])
}

fn print_case(case: &CollectionCase, global: &GlobalOpts) {
    let out = output::render_single(global.format(), case, case_detail, |c| c.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: CollectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CollectionsCommand::List {
            page,
            status,
            assignee,
        } => {
            let filter = CaseFilter { status, assignee };
            let cases = client
                .list_collection_cases(util::page_request(page), &filter)
                .await?;
            let out = output::render_page(
                global.format(),
                &cases,
                |c| CaseRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CollectionsCommand::Get { id } => {
            let case = client.get_collection_case(&id).await?;
            print_case(&case, global);
            Ok(())
        }

        CollectionsCommand::Assign { id, agent } => {
            let case = client.assign_collection_case(&id, &agent).await?;
            output::print_done(&format!("Case {id} assigned to {agent}"), global.quiet);
            print_case(&case, global);
            Ok(())
        }

        CollectionsCommand::Log {
            id,
            action_type,
            notes,
            promised_amount,
            promised_date,
        } => {
            let action = NewCollectionAction {
                action_type: action_type.to_ascii_uppercase(),
                notes,
                promised_amount: util::parse_opt_amount(
                    "promised-amount",
                    promised_amount.as_deref(),
                )?,
                promised_date: util::parse_opt_date("promised-date", promised_date.as_deref())?,
            };
            let logged = client.log_collection_action(&id, &action).await?;
            output::print_done(
                &format!("{} logged on case {id}", logged.action_type),
                global.quiet,
            );
            Ok(())
        }

        CollectionsCommand::Actions { id } => {
            let actions = client.list_collection_actions(&id).await?;
            let out = output::render_list(
                global.format(),
                &actions,
                |a| ActionRow::from(a),
                |a| a.id.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
