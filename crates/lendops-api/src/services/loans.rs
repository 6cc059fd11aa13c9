// Loans service endpoints
//
// Loan lifecycle actions (approve, reject, disburse) are POSTs on the loan
// resource; the service returns the updated loan.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::{Page, PageRequest};
use crate::types::{
    DisbursementRequest, Installment, Loan, LoanFilter, NewLoanApplication, NewRepayment,
    Repayment,
};

const BASE_PATH: &str = "loans/api/v1/loans";

impl ApiClient {
    /// `GET loans?page&size[&status][&customerId][&branchId]`
    pub async fn list_loans(
        &self,
        page: PageRequest,
        filter: &LoanFilter,
    ) -> Result<Page<Loan>, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        let mut query = page.to_query();
        if let Some(status) = filter.status {
            query.push(("status", status.to_string()));
        }
        if let Some(ref customer_id) = filter.customer_id {
            query.push(("customerId", customer_id.clone()));
        }
        if let Some(ref branch_id) = filter.branch_id {
            query.push(("branchId", branch_id.clone()));
        }
        debug!(page = page.page, size = page.size, "listing loans");
        self.get_with_query(url, &query)
            .await
            .into_data("Failed to fetch loans")
    }

    /// `GET loans/{id}`
    pub async fn get_loan(&self, loan_id: &str) -> Result<Loan, Error> {
        let url = self.endpoint(BASE_PATH, &[loan_id])?;
        self.get(url).await.into_data("Failed to fetch loan")
    }

    /// Submit a new application.
    ///
    /// `POST loans`
    pub async fn create_loan(&self, application: &NewLoanApplication) -> Result<Loan, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        debug!(customer_id = %application.customer_id, "creating loan application");
        self.post(url, Some(application))
            .await
            .into_data("Failed to create loan application")
    }

    /// `POST loans/{id}/approve`
    pub async fn approve_loan(&self, loan_id: &str, comment: Option<&str>) -> Result<Loan, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            comment: Option<&'a str>,
        }

        let url = self.endpoint(BASE_PATH, &[loan_id, "approve"])?;
        debug!(loan_id, "approving loan");
        self.post(url, Some(&Body { comment }))
            .await
            .into_data("Failed to approve loan")
    }

    /// `POST loans/{id}/reject`
    pub async fn reject_loan(&self, loan_id: &str, reason: &str) -> Result<Loan, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            reason: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &[loan_id, "reject"])?;
        debug!(loan_id, reason, "rejecting loan");
        self.post(url, Some(&Body { reason }))
            .await
            .into_data("Failed to reject loan")
    }

    /// `POST loans/{id}/disburse`
    pub async fn disburse_loan(
        &self,
        loan_id: &str,
        request: &DisbursementRequest,
    ) -> Result<Loan, Error> {
        let url = self.endpoint(BASE_PATH, &[loan_id, "disburse"])?;
        debug!(loan_id, channel = %request.channel, "disbursing loan");
        self.post(url, Some(request))
            .await
            .into_data("Failed to disburse loan")
    }

    /// `GET loans/{id}/schedule`
    pub async fn loan_schedule(&self, loan_id: &str) -> Result<Vec<Installment>, Error> {
        let url = self.endpoint(BASE_PATH, &[loan_id, "schedule"])?;
        self.get(url)
            .await
            .into_data("Failed to fetch repayment schedule")
    }

    /// `GET loans/{id}/repayments`
    pub async fn list_repayments(&self, loan_id: &str) -> Result<Vec<Repayment>, Error> {
        let url = self.endpoint(BASE_PATH, &[loan_id, "repayments"])?;
        self.get(url).await.into_data("Failed to fetch repayments")
    }

    /// `POST loans/{id}/repayments`
    pub async fn record_repayment(
        &self,
        loan_id: &str,
        repayment: &NewRepayment,
    ) -> Result<Repayment, Error> {
        let url = self.endpoint(BASE_PATH, &[loan_id, "repayments"])?;
        debug!(loan_id, amount = %repayment.amount, "recording repayment");
        self.post(url, Some(repayment))
            .await
            .into_data("Failed to record repayment")
    }
}
