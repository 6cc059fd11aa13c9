//! Organization command handlers.

use tabled::Tabled;

use lendops_api::{ApiClient, Branch, OrganizationSettings};

use crate::cli::{GlobalOpts, OrgArgs, OrgCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct BranchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Manager")]
    manager: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl From<&Branch> for BranchRow {
    fn from(b: &Branch) -> Self {
        Self {
            id: b.id.clone().unwrap_or_default(),
            code: b.code.clone(),
            name: b.name.clone(),
            region: b.region.clone().unwrap_or_default(),
            manager: b.manager_id.clone().unwrap_or_default(),
            active: if b.active { "yes" } else { "no" }.into(),
        }
    }
}

fn settings_detail(s: &OrganizationSettings) -> String {
    output::detail(&[
        ("Name", s.name.clone()),
        ("Legal name", s.legal_name.clone().unwrap_or_default()),
        ("Base currency", s.base_currency.clone().unwrap_or_default()),
        ("Timezone", s.timezone.clone().unwrap_or_default()),
        ("Financial year", s.financial_year_start.clone().unwrap_or_default()),
        ("Email", s.contact_email.clone().unwrap_or_default()),
        ("Phone", s.contact_phone.clone().unwrap_or_default()),
    ])
}

fn print_settings(settings: &OrganizationSettings, global: &GlobalOpts) {
    let out = output::render_single(global.format(), settings, settings_detail, |s| {
        s.name.clone()
    });
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &ApiClient, args: OrgArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        OrgCommand::Settings => {
            let settings = client.organization_settings().await?;
            print_settings(&settings, global);
            Ok(())
        }

        OrgCommand::Update(payload) => {
            let settings: OrganizationSettings = util::read_json_file(&payload.from_file)?;
            if !util::confirm(
                "Replace the organization settings?",
                "org update",
                global.yes,
            )? {
                return Ok(());
            }
            let updated = client.update_organization_settings(&settings).await?;
            output::print_done("Organization settings saved", global.quiet);
            print_settings(&updated, global);
            Ok(())
        }

        OrgCommand::Branches => {
            let branches = client.list_branches().await?;
            let out = output::render_list(
                global.format(),
                &branches,
                |b| BranchRow::from(b),
                |b| b.code.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrgCommand::AddBranch(payload) => {
            let mut branch: Branch = util::read_json_file(&payload.from_file)?;
            branch.id = None;
            let created = client.create_branch(&branch).await?;
            output::print_done(
                &format!(
                    "Branch {} opened ({})",
                    created.code,
                    created.id.as_deref().unwrap_or("no id")
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
