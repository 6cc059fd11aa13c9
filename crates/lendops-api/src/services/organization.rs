// Organization settings endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Branch, OrganizationSettings};

const BASE_PATH: &str = "organization/api/v1/settings";

impl ApiClient {
    /// `GET settings`
    pub async fn organization_settings(&self) -> Result<OrganizationSettings, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        self.get(url)
            .await
            .into_data("Failed to fetch organization settings")
    }

    /// `PUT settings`
    pub async fn update_organization_settings(
        &self,
        settings: &OrganizationSettings,
    ) -> Result<OrganizationSettings, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        debug!(name = %settings.name, "updating organization settings");
        self.put(url, Some(settings))
            .await
            .into_data("Failed to update organization settings")
    }

    /// `GET settings/branches`
    pub async fn list_branches(&self) -> Result<Vec<Branch>, Error> {
        let url = self.endpoint(BASE_PATH, &["branches"])?;
        self.get(url).await.into_data("Failed to fetch branches")
    }

    /// `POST settings/branches`
    pub async fn create_branch(&self, branch: &Branch) -> Result<Branch, Error> {
        let url = self.endpoint(BASE_PATH, &["branches"])?;
        debug!(code = %branch.code, "creating branch");
        self.post(url, Some(branch))
            .await
            .into_data("Failed to create branch")
    }
}
