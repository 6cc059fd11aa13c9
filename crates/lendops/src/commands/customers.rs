//! Customer command handlers.

use tabled::Tabled;

use lendops_api::{ApiClient, Customer, NewCustomer};

use crate::cli::{CustomersArgs, CustomersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "National ID")]
    national_id: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "KYC")]
    kyc: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.clone(),
            name: c.full_name(),
            national_id: c.national_id.clone().unwrap_or_default(),
            phone: c.phone.clone().unwrap_or_default(),
            kyc: c.kyc_status.as_deref().map(output::status).unwrap_or_default(),
        }
    }
}

fn customer_detail(c: &Customer) -> String {
    output::detail(&[
        ("ID", c.id.clone()),
        ("Number", c.customer_number.clone().unwrap_or_default()),
        ("Name", c.full_name()),
        ("National ID", c.national_id.clone().unwrap_or_default()),
        ("Phone", c.phone.clone().unwrap_or_default()),
        ("Email", c.email.clone().unwrap_or_default()),
        ("KYC", c.kyc_status.clone().unwrap_or_default()),
        ("Branch", c.branch_id.clone().unwrap_or_default()),
        ("Created", output::opt(c.created_at.as_ref())),
    ])
}

fn print_customer(customer: &Customer, global: &GlobalOpts) {
    let out = output::render_single(global.format(), customer, customer_detail, |c| c.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: CustomersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CustomersCommand::List { page, search } => {
            let customers = client
                .list_customers(util::page_request(page), search.as_deref())
                .await?;
            let out = output::render_page(
                global.format(),
                &customers,
                |c| CustomerRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CustomersCommand::Get { id } => {
            let customer = client.get_customer(&id).await?;
            print_customer(&customer, global);
            Ok(())
        }

        CustomersCommand::Create(payload) => {
            let new: NewCustomer = util::read_json_file(&payload.from_file)?;
            let customer = client.create_customer(&new).await?;
            output::print_done(&format!("Customer {} registered", customer.id), global.quiet);
            print_customer(&customer, global);
            Ok(())
        }

        CustomersCommand::Update { id, payload } => {
            let update: NewCustomer = util::read_json_file(&payload.from_file)?;
            let customer = client.update_customer(&id, &update).await?;
            output::print_done(&format!("Customer {id} updated"), global.quiet);
            print_customer(&customer, global);
            Ok(())
        }
    }
}
