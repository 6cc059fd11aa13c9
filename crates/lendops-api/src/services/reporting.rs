// Reporting service endpoints
//
// The dashboard and disbursement report are lenient (default value on
// failure) so a reporting outage leaves the dashboard empty rather than
// broken. Portfolio-at-risk is strict.

use chrono::NaiveDate;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{DashboardSummary, DateRange, DisbursementSummary, PortfolioAtRisk};

const BASE_PATH: &str = "reporting/api/v1/reports";

impl ApiClient {
    /// Headline figures. All-zero summary on failure.
    ///
    /// `GET dashboard`
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, Error> {
        let url = self.endpoint(BASE_PATH, &["dashboard"])?;
        Ok(self.get(url).await.into_data_or_default("dashboard summary"))
    }

    /// `GET portfolio-at-risk[?asOf]`
    pub async fn portfolio_at_risk(&self, as_of: Option<NaiveDate>) -> Result<PortfolioAtRisk, Error> {
        let url = self.endpoint(BASE_PATH, &["portfolio-at-risk"])?;
        let query: Vec<(&str, String)> = as_of
            .map(|date| ("asOf", date.to_string()))
            .into_iter()
            .collect();
        debug!(?as_of, "fetching portfolio at risk");
        self.get_with_query(url, &query)
            .await
            .into_data("Failed to fetch portfolio at risk report")
    }

    /// Daily disbursement totals. Empty on failure.
    ///
    /// `GET disbursements[?from][&to]`
    pub async fn disbursement_report(
        &self,
        range: DateRange,
    ) -> Result<Vec<DisbursementSummary>, Error> {
        let url = self.endpoint(BASE_PATH, &["disbursements"])?;
        debug!(?range, "fetching disbursement report");
        Ok(self
            .get_with_query(url, &range.to_query())
            .await
            .into_data_or_default("disbursement report"))
    }
}
