// Customer endpoints (served by the loans service)
//
// The list endpoint returns a page envelope on current deployments and a
// raw array on older ones; both normalize to a `Page`.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::{Listing, Page, PageRequest};
use crate::types::{Customer, NewCustomer};

const BASE_PATH: &str = "loans/api/v1/customers";

impl ApiClient {
    /// `GET customers?page&size[&search]`
    pub async fn list_customers(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<Customer>, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        let mut query = page.to_query();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search.to_owned()));
        }
        debug!(page = page.page, size = page.size, ?search, "listing customers");
        let listing: Listing<Customer> = self
            .get_with_query(url, &query)
            .await
            .into_data("Failed to fetch customers")?;
        Ok(listing.into_page())
    }

    /// `GET customers/{id}`
    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer, Error> {
        let url = self.endpoint(BASE_PATH, &[customer_id])?;
        self.get(url).await.into_data("Failed to fetch customer")
    }

    /// `POST customers`
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        debug!("creating customer");
        self.post(url, Some(customer))
            .await
            .into_data("Failed to create customer")
    }

    /// `PUT customers/{id}`
    pub async fn update_customer(
        &self,
        customer_id: &str,
        customer: &NewCustomer,
    ) -> Result<Customer, Error> {
        let url = self.endpoint(BASE_PATH, &[customer_id])?;
        debug!(customer_id, "updating customer");
        self.put(url, Some(customer))
            .await
            .into_data("Failed to update customer")
    }
}
