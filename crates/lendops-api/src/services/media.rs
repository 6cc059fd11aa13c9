// Media service endpoints
//
// Uploads are multipart with `file`, `category` and `referenceId` fields.

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{FileUpload, MediaFile};

const BASE_PATH: &str = "media/api/v1/media";

impl ApiClient {
    /// `POST upload` (multipart)
    pub async fn upload_file(&self, upload: FileUpload) -> Result<MediaFile, Error> {
        let url = self.endpoint(BASE_PATH, &["upload"])?;
        let FileUpload {
            file_name,
            content_type,
            bytes,
            category,
            reference_id,
        } = upload;

        let mime = content_type.unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string()
        });
        debug!(%file_name, %mime, size = bytes.len(), %category, %reference_id, "uploading file");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| Error::InvalidHeader {
                name: "Content-Type".into(),
                reason: e.to_string(),
            })?;
        let form = Form::new()
            .part("file", part)
            .text("category", category)
            .text("referenceId", reference_id);

        self.upload(url, form)
            .await
            .into_data("Failed to upload file")
    }

    /// Files attached to a customer, loan or case. Empty on failure.
    ///
    /// `GET references/{referenceId}`
    pub async fn list_media(&self, reference_id: &str) -> Result<Vec<MediaFile>, Error> {
        let url = self.endpoint(BASE_PATH, &["references", reference_id])?;
        Ok(self.get(url).await.into_data_or_default("list media"))
    }

    /// `GET {id}`
    pub async fn get_media(&self, media_id: &str) -> Result<MediaFile, Error> {
        let url = self.endpoint(BASE_PATH, &[media_id])?;
        self.get(url).await.into_data("Failed to fetch file")
    }

    /// `DELETE {id}` (answers 204)
    pub async fn delete_media(&self, media_id: &str) -> Result<(), Error> {
        let url = self.endpoint(BASE_PATH, &[media_id])?;
        debug!(media_id, "deleting file");
        self.delete::<Value>(url)
            .await
            .into_unit("Failed to delete file")
    }
}
