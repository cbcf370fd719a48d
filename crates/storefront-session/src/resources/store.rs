//! Store profile, storefront configuration and image uploads.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::http::{ApiError, HttpExecutor, RequestOptions};

const STORE_PATH: &str = "/store/";
const CONFIGURATION_PATH: &str = "/configurations/";

/// The signed-in seller's store.
///
/// Fields the client does not model are kept in `extra` and sent back
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which store image an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Logo,
    Cover,
}

impl UploadKind {
    fn path(self) -> &'static str {
        match self {
            Self::Logo => "/logo/",
            Self::Cover => "/cover/",
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Cover => "cover",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Store endpoints, authenticated through the shared token store.
#[derive(Debug, Clone)]
pub struct StoreApi {
    pub(super) executor: Arc<HttpExecutor>,
}

impl StoreApi {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }

    pub async fn get_store(&self) -> Result<Store, ApiError> {
        let options = RequestOptions::get().error_message("Failed to load store");
        self.executor.execute_as(STORE_PATH, options).await
    }

    /// Applies a partial update and returns the stored result.
    pub async fn update_store(&self, changes: Value) -> Result<Store, ApiError> {
        let options = RequestOptions::patch()
            .json(changes)
            .error_message("Failed to update store");
        let store: Store = self.executor.execute_as(STORE_PATH, options).await?;
        info!(store_name = %store.store_name, "Store updated");
        Ok(store)
    }

    /// Storefront theme and layout settings; the shape is owned by the
    /// backend.
    pub async fn get_configuration(&self) -> Result<Value, ApiError> {
        let options = RequestOptions::get().error_message("Failed to load configuration");
        self.executor.execute(CONFIGURATION_PATH, options).await
    }

    pub async fn update_configuration(&self, configuration: Value) -> Result<Value, ApiError> {
        let options = RequestOptions::put()
            .json(configuration)
            .error_message("Failed to save configuration");
        let saved = self.executor.execute(CONFIGURATION_PATH, options).await?;
        info!("Storefront configuration saved");
        Ok(saved)
    }

    pub async fn upload_logo(
        &self,
        file_name: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<Value, ApiError> {
        self.upload(UploadKind::Logo, file_name, data.into(), content_type)
            .await
    }

    pub async fn upload_cover(
        &self,
        file_name: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Result<Value, ApiError> {
        self.upload(UploadKind::Cover, file_name, data.into(), content_type)
            .await
    }

    /// Sends one image as a multipart form under the kind's field name.
    pub async fn upload(
        &self,
        kind: UploadKind,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<Value, ApiError> {
        let size = data.len();
        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid content type: {e}")))?;
        let form = Form::new().part(kind.field(), part);

        debug!(kind = %kind, file_name = %file_name, size, "Uploading store image");
        let options = RequestOptions::post()
            .multipart(form)
            .error_message(format!("Failed to upload {kind}"));
        let result = self.executor.execute(kind.path(), options).await?;
        info!(kind = %kind, file_name = %file_name, "Store image uploaded");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_store_keeps_unknown_fields() {
        let store: Store = serde_json::from_value(json!({
            "id": 4,
            "store_name": "Corner Shop",
            "subdomain": "corner",
            "currency": "NGN"
        }))
        .expect("store");

        assert_eq!(store.id, Some(4));
        assert_eq!(store.subdomain.as_deref(), Some("corner"));
        assert_eq!(store.extra.get("currency"), Some(&json!("NGN")));

        let back = serde_json::to_value(&store).expect("json");
        assert_eq!(back["currency"], "NGN");
        assert!(back.get("logo").is_none());
    }

    #[test]
    fn test_upload_kind_routes() {
        assert_eq!(UploadKind::Logo.path(), "/logo/");
        assert_eq!(UploadKind::Cover.path(), "/cover/");
        assert_eq!(UploadKind::Cover.to_string(), "cover");
    }
}
