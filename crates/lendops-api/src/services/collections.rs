// Collections service endpoints
//
// Both listing calls here are lenient: a failed or empty response yields an
// empty page/list rather than an error, which is what the case board
// expects. Only URL construction can fail them.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::{Page, PageRequest};
use crate::types::{CaseFilter, CollectionAction, CollectionCase, NewCollectionAction};

const BASE_PATH: &str = "collections/api/v1/collections";

impl ApiClient {
    /// Cases in the collections queue. Empty page on failure.
    ///
    /// `GET cases?page&size[&status][&assignee]`
    pub async fn list_collection_cases(
        &self,
        page: PageRequest,
        filter: &CaseFilter,
    ) -> Result<Page<CollectionCase>, Error> {
        let url = self.endpoint(BASE_PATH, &["cases"])?;
        let mut query = page.to_query();
        if let Some(ref status) = filter.status {
            query.push(("status", status.clone()));
        }
        if let Some(ref assignee) = filter.assignee {
            query.push(("assignee", assignee.clone()));
        }
        debug!(page = page.page, size = page.size, "listing collection cases");
        Ok(self
            .get_with_query(url, &query)
            .await
            .into_data_or_default("list collection cases"))
    }

    /// `GET cases/{id}`
    pub async fn get_collection_case(&self, case_id: &str) -> Result<CollectionCase, Error> {
        let url = self.endpoint(BASE_PATH, &["cases", case_id])?;
        self.get(url)
            .await
            .into_data("Failed to fetch collection case")
    }

    /// `PATCH cases/{id}/assign` with `{"agentId": ...}`
    pub async fn assign_collection_case(
        &self,
        case_id: &str,
        agent_id: &str,
    ) -> Result<CollectionCase, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            agent_id: &'a str,
        }

        let url = self.endpoint(BASE_PATH, &["cases", case_id, "assign"])?;
        debug!(case_id, agent_id, "assigning collection case");
        self.patch(url, Some(&Body { agent_id }))
            .await
            .into_data("Failed to assign collection case")
    }

    /// Log a call, visit, or promise-to-pay against a case.
    ///
    /// `POST cases/{id}/actions`
    pub async fn log_collection_action(
        &self,
        case_id: &str,
        action: &NewCollectionAction,
    ) -> Result<CollectionAction, Error> {
        let url = self.endpoint(BASE_PATH, &["cases", case_id, "actions"])?;
        debug!(case_id, action_type = %action.action_type, "logging collection action");
        self.post(url, Some(action))
            .await
            .into_data("Failed to log collection action")
    }

    /// Action history for a case. Empty on failure.
    ///
    /// `GET cases/{id}/actions`
    pub async fn list_collection_actions(
        &self,
        case_id: &str,
    ) -> Result<Vec<CollectionAction>, Error> {
        let url = self.endpoint(BASE_PATH, &["cases", case_id, "actions"])?;
        Ok(self
            .get(url)
            .await
            .into_data_or_default("list collection actions"))
    }
}
