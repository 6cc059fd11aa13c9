// Products service endpoints

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::page::Listing;
use crate::types::{NewProduct, Product};

const BASE_PATH: &str = "products/api/v1/products";

impl ApiClient {
    /// All loan products. Accepts either a raw array or a page envelope.
    ///
    /// `GET products`
    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        let listing: Listing<Product> = self
            .get(url)
            .await
            .into_data("Failed to fetch products")?;
        Ok(listing.into_vec())
    }

    /// `GET products/{id}`
    pub async fn get_product(&self, product_id: &str) -> Result<Product, Error> {
        let url = self.endpoint(BASE_PATH, &[product_id])?;
        self.get(url).await.into_data("Failed to fetch product")
    }

    /// `POST products`
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, Error> {
        let url = self.endpoint(BASE_PATH, &[])?;
        debug!(code = %product.code, "creating product");
        self.post(url, Some(product))
            .await
            .into_data("Failed to create product")
    }

    /// `PUT products/{id}`
    pub async fn update_product(
        &self,
        product_id: &str,
        product: &NewProduct,
    ) -> Result<Product, Error> {
        let url = self.endpoint(BASE_PATH, &[product_id])?;
        debug!(product_id, "updating product");
        self.put(url, Some(product))
            .await
            .into_data("Failed to update product")
    }

    /// Enable or retire a product for new applications.
    ///
    /// `PATCH products/{id}/status` with `{"active": bool}`
    pub async fn set_product_active(&self, product_id: &str, active: bool) -> Result<Product, Error> {
        #[derive(Serialize)]
        struct Body {
            active: bool,
        }

        let url = self.endpoint(BASE_PATH, &[product_id, "status"])?;
        debug!(product_id, active, "changing product status");
        self.patch(url, Some(&Body { active }))
            .await
            .into_data("Failed to update product status")
    }
}
