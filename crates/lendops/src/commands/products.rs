//! Product command handlers.

use std::fmt::Display;

use tabled::Tabled;

use lendops_api::{ApiClient, NewProduct, Product};

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Term (months)")]
    term: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn range<T: Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("{min}+"),
        (None, Some(max)) => format!("up to {max}"),
        (None, None) => String::new(),
    }
}

fn active_label(active: bool) -> String {
    output::status(if active { "ACTIVE" } else { "INACTIVE" })
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            code: p.code.clone().unwrap_or_default(),
            name: p.name.clone(),
            rate: output::opt(p.interest_rate.as_ref()),
            principal: range(
                p.min_principal.map(output::money),
                p.max_principal.map(output::money),
            ),
            term: range(p.min_term_months, p.max_term_months),
            status: active_label(p.active),
        }
    }
}

fn product_detail(p: &Product) -> String {
    output::detail(&[
        ("ID", p.id.clone()),
        ("Code", p.code.clone().unwrap_or_default()),
        ("Name", p.name.clone()),
        ("Type", p.product_type.clone().unwrap_or_default()),
        ("Currency", p.currency.clone().unwrap_or_default()),
        ("Interest rate", output::opt(p.interest_rate.as_ref())),
        ("Interest method", p.interest_method.clone().unwrap_or_default()),
        (
            "Principal",
            range(p.min_principal.map(output::money), p.max_principal.map(output::money)),
        ),
        ("Term (months)", range(p.min_term_months, p.max_term_months)),
        ("Status", active_label(p.active)),
    ])
}

fn print_product(product: &Product, global: &GlobalOpts) {
    let out = output::render_single(global.format(), product, product_detail, |p| p.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List => {
            let products = client.list_products().await?;
            let out = output::render_list(
                global.format(),
                &products,
                |p| ProductRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = client.get_product(&id).await?;
            print_product(&product, global);
            Ok(())
        }

        ProductsCommand::Create(payload) => {
            let new: NewProduct = util::read_json_file(&payload.from_file)?;
            let product = client.create_product(&new).await?;
            output::print_done(&format!("Product {} created", product.id), global.quiet);
            print_product(&product, global);
            Ok(())
        }

        ProductsCommand::Update { id, payload } => {
            let update: NewProduct = util::read_json_file(&payload.from_file)?;
            let product = client.update_product(&id, &update).await?;
            output::print_done(&format!("Product {id} updated"), global.quiet);
            print_product(&product, global);
            Ok(())
        }

        ProductsCommand::Activate { id } => {
            let product = client.set_product_active(&id, true).await?;
            output::print_done(&format!("Product {id} activated"), global.quiet);
            print_product(&product, global);
            Ok(())
        }

        ProductsCommand::Deactivate { id } => {
            if !util::confirm(
                &format!("Deactivate product {id}? New applications will be refused."),
                "products deactivate",
                global.yes,
            )? {
                return Ok(());
            }
            let product = client.set_product_active(&id, false).await?;
            output::print_done(&format!("Product {id} deactivated"), global.quiet);
            print_product(&product, global);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_render_open_ends() {
        assert_eq!(range(Some(3), Some(12)), "3-12");
        assert_eq!(range(Some(3), None), "3+");
        assert_eq!(range(None::<u32>, Some(12)), "up to 12");
        assert_eq!(range(None::<u32>, None), "");
    }
}
