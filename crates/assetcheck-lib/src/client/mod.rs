use crate::error::AssetCheckError;
use crate::verification::status_indicates_success;
use itertools::Itertools;
use reqwest::header::{ETAG, HeaderMap};
use serde_json::Value;
use std::collections::BTreeSet;
use url::Url;

/// A fully buffered HTTP response: status, headers and raw body bytes.
///
/// Owned transiently by the step that triggered the request; nothing is
/// retained across scenarios.
#[derive(Debug, Clone)]
pub struct DownloadResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl DownloadResponse {
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The closed set of binary download operations the API exposes.
///
/// Replaces resolve-method-by-name dispatch; an unknown operation is a
/// compile error rather than a runtime lookup failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperation {
    GetBinaryById { id: String },
    GetBinaryZipByIds { item_ids: BTreeSet<String> },
}

/// HTTP client bound to the system under test.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, AssetCheckError> {
        // A trailing slash keeps Url::join from swallowing the last path
        // segment of the base.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| AssetCheckError::InvalidBaseUrl {
            url: normalized.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AssetCheckError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AssetCheckError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<DownloadResponse, AssetCheckError> {
        let response = request.send().await?;
        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status = status_code, bytes = body.len(), "Received response");

        Ok(DownloadResponse {
            status_code,
            headers,
            body,
        })
    }

    pub async fn get(&self, path: &str) -> Result<DownloadResponse, AssetCheckError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "GET");
        self.execute(self.http.get(url)).await
    }

    pub async fn post(
        &self,
        path: &str,
        data: Option<&Value>,
    ) -> Result<DownloadResponse, AssetCheckError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "POST");
        let mut request = self.http.post(url);
        if let Some(data) = data {
            request = request.json(data);
        }
        self.execute(request).await
    }

    pub async fn patch(
        &self,
        path: &str,
        data: Option<&Value>,
    ) -> Result<DownloadResponse, AssetCheckError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "PATCH");
        let mut request = self.http.patch(url);
        if let Some(data) = data {
            request = request.json(data);
        }
        self.execute(request).await
    }

    pub async fn delete(&self, path: &str) -> Result<DownloadResponse, AssetCheckError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, "DELETE");
        self.execute(self.http.delete(url)).await
    }

    /// Uploads fixture bytes as the `binary` part of a multipart form.
    pub async fn upload_binary(
        &self,
        path: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<DownloadResponse, AssetCheckError> {
        let url = self.endpoint(path)?;
        tracing::debug!(url = %url, filename, "Uploading binary");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("binary", part);
        self.execute(self.http.post(url).multipart(form)).await
    }

    pub async fn download_binary(
        &self,
        operation: &BinaryOperation,
    ) -> Result<DownloadResponse, AssetCheckError> {
        match operation {
            BinaryOperation::GetBinaryById { id } => {
                self.get(&format!("assets/binary/{id}")).await
            }
            BinaryOperation::GetBinaryZipByIds { item_ids } => {
                let ids = item_ids.iter().join(",");
                self.get(&format!("assets/binary_zip?item_ids={ids}")).await
            }
        }
    }

    /// Resolves logical asset identifiers to their stored filenames through
    /// the asset catalog endpoint.
    pub async fn resolve_filenames(
        &self,
        item_ids: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, AssetCheckError> {
        let ids = item_ids.iter().join(",");
        let response = self.get(&format!("assets?item_ids={ids}")).await?;

        if !status_indicates_success(response.status_code) {
            return Err(AssetCheckError::AssetLookup {
                details: format!("asset catalog returned status {}", response.status_code),
            });
        }

        let value = response.json()?;
        let items = value
            .get("_items")
            .and_then(Value::as_array)
            .ok_or_else(|| AssetCheckError::AssetLookup {
                details: "asset catalog response has no _items array".to_string(),
            })?;

        let mut filenames = BTreeSet::new();
        for item in items {
            let filename = item
                .get("filename")
                .and_then(Value::as_str)
                .ok_or_else(|| AssetCheckError::AssetLookup {
                    details: format!("asset entry has no filename: {item}"),
                })?;
            filenames.insert(filename.to_string());
        }

        Ok(filenames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response_with_etag(value: &str) -> DownloadResponse {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_str(value).unwrap());
        DownloadResponse {
            status_code: 200,
            headers,
            body: Vec::new(),
        }
    }

    #[test]
    fn test_etag_accessor() {
        assert_eq!(response_with_etag("\"abc\"").etag(), Some("\"abc\""));
    }

    #[test]
    fn test_etag_accessor_missing_header() {
        let response = DownloadResponse {
            status_code: 200,
            headers: HeaderMap::new(),
            body: Vec::new(),
        };
        assert_eq!(response.etag(), None);
    }

    #[test]
    fn test_base_url_requires_valid_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("http://localhost:5700/api").is_ok());
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let client = ApiClient::new("http://localhost:5700/api").unwrap();
        let url = client.endpoint("assets/binary/abc").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5700/api/assets/binary/abc");
    }

    #[test]
    fn test_json_accessor_parses_body() {
        let response = DownloadResponse {
            status_code: 200,
            headers: HeaderMap::new(),
            body: br#"{"_items": []}"#.to_vec(),
        };
        let value = response.json().unwrap();
        assert!(value.get("_items").is_some());
    }
}
