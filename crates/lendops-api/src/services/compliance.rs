// Compliance service endpoints
//
// AML/KYC alerts, customer risk profiles and sanctions screening. Scores
// and matches are computed server-side.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::{Page, PageRequest};
use crate::types::{AlertFilter, AlertResolution, ComplianceAlert, RiskProfile, ScreeningResult};

const BASE_PATH: &str = "compliance/api/v1/compliance";

impl ApiClient {
    /// `GET alerts?page&size[&severity][&status]`
    pub async fn list_compliance_alerts(
        &self,
        page: PageRequest,
        filter: &AlertFilter,
    ) -> Result<Page<ComplianceAlert>, Error> {
        let url = self.endpoint(BASE_PATH, &["alerts"])?;
        let mut query = page.to_query();
        if let Some(ref severity) = filter.severity {
            query.push(("severity", severity.clone()));
        }
        if let Some(ref status) = filter.status {
            query.push(("status", status.clone()));
        }
        debug!(page = page.page, size = page.size, "listing compliance alerts");
        self.get_with_query(url, &query)
            .await
            .into_data("Failed to fetch compliance alerts")
    }

    /// `GET alerts/{id}`
    pub async fn get_compliance_alert(&self, alert_id: &str) -> Result<ComplianceAlert, Error> {
        let url = self.endpoint(BASE_PATH, &["alerts", alert_id])?;
        self.get(url)
            .await
            .into_data("Failed to fetch compliance alert")
    }

    /// `PATCH alerts/{id}/resolve`
    pub async fn resolve_compliance_alert(
        &self,
        alert_id: &str,
        resolution: &AlertResolution,
    ) -> Result<ComplianceAlert, Error> {
        let url = self.endpoint(BASE_PATH, &["alerts", alert_id, "resolve"])?;
        debug!(alert_id, resolution = %resolution.resolution, "resolving compliance alert");
        self.patch(url, Some(resolution))
            .await
            .into_data("Failed to resolve compliance alert")
    }

    /// `GET customers/{customerId}/risk-profile`
    pub async fn customer_risk_profile(&self, customer_id: &str) -> Result<RiskProfile, Error> {
        let url = self.endpoint(BASE_PATH, &["customers", customer_id, "risk-profile"])?;
        self.get(url).await.into_data("Failed to fetch risk profile")
    }

    /// Run sanctions/PEP screening for a customer.
    ///
    /// `POST screenings` with `{"customerId": ...}`
    pub async fn screen_customer(&self, customer_id: &str) -> Result<ScreeningResult, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            customer_id: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["screenings"])?;
        debug!(customer_id, "screening customer");
        self.post(url, Some(&Body { customer_id }))
            .await
            .into_data("Failed to screen customer")
    }
}
