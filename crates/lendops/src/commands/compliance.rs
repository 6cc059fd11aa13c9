//! Compliance command handlers.

use tabled::Tabled;

use lendops_api::{
    AlertFilter, AlertResolution, ApiClient, ComplianceAlert, RiskProfile, ScreeningResult,
};

use crate::cli::{ComplianceArgs, ComplianceCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    alert_type: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Raised")]
    raised: String,
}

impl From<&ComplianceAlert> for AlertRow {
    fn from(a: &ComplianceAlert) -> Self {
        Self {
            id: a.id.clone(),
            alert_type: a.alert_type.clone(),
            severity: output::status(&a.severity),
            status: output::status(&a.status),
            customer: a.customer_id.clone().unwrap_or_default(),
            raised: a
                .raised_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

fn alert_detail(a: &ComplianceAlert) -> String {
    output::detail(&[
        ("ID", a.id.clone()),
        ("Type", a.alert_type.clone()),
        ("Severity", output::status(&a.severity)),
        ("Status", output::status(&a.status)),
        ("Customer", a.customer_id.clone().unwrap_or_default()),
        ("Loan", a.loan_id.clone().unwrap_or_default()),
        ("Raised", output::opt(a.raised_at.as_ref())),
        ("Description", a.description.clone().unwrap_or_default()),
    ])
}

fn risk_detail(r: &RiskProfile) -> String {
    output::detail(&[
        ("Customer", r.customer_id.clone()),
        ("Risk level", r.risk_level.as_deref().map(output::status).unwrap_or_default()),
        ("Risk score", output::opt(r.risk_score.as_ref())),
        ("Factors", r.factors.join(", ")),
        ("Last assessed", output::opt(r.last_assessed.as_ref())),
    ])
}

fn screening_detail(s: &ScreeningResult) -> String {
    let verdict = if s.matched {
        output::status(format!("MATCH ({})", s.matches.len()))
    } else {
        "clear".into()
    };
    output::detail(&[
        ("Customer", s.customer_id.clone()),
        ("Result", verdict),
        ("Lists checked", s.lists_checked.join(", ")),
        ("Screened", output::opt(s.screened_at.as_ref())),
    ])
}

fn print_alert(alert: &ComplianceAlert, global: &GlobalOpts) {
    let out = output::render_single(global.format(), alert, alert_detail, |a| a.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ComplianceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ComplianceCommand::Alerts {
            page,
            severity,
            status,
        } => {
            let filter = AlertFilter { severity, status };
            let alerts = client
                .list_compliance_alerts(util::page_request(page), &filter)
                .await?;
            let out = output::render_page(
                global.format(),
                &alerts,
                |a| AlertRow::from(a),
                |a| a.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ComplianceCommand::Alert { id } => {
            let alert = client.get_compliance_alert(&id).await?;
            print_alert(&alert, global);
            Ok(())
        }

        ComplianceCommand::Resolve {
            id,
            resolution,
            notes,
        } => {
            if !util::confirm(
                &format!("Resolve alert {id} as {resolution}?"),
                "compliance resolve",
                global.yes,
            )? {
                return Ok(());
            }
            let resolution = AlertResolution { resolution, notes };
            let alert = client.resolve_compliance_alert(&id, &resolution).await?;
            output::print_done(&format!("Alert {id} resolved"), global.quiet);
            print_alert(&alert, global);
            Ok(())
        }

        ComplianceCommand::Risk { customer_id } => {
            let profile = client.customer_risk_profile(&customer_id).await?;
            let out = output::render_single(global.format(), &profile, risk_detail, |r| {
                r.risk_level.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ComplianceCommand::Screen { customer_id } => {
            let result = client.screen_customer(&customer_id).await?;
            if result.matched {
                tracing::warn!(customer = %customer_id, matches = result.matches.len(), "screening hit");
            }
            let out = output::render_single(global.format(), &result, screening_detail, |s| {
                if s.matched { "match" } else { "clear" }.to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
