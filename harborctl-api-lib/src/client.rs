use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::auth::{Authenticable, RegistryAuth};

const API_BASE: &str = "api/v2.0";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Harbor API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("Invalid JSON body: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    code: String,
    message: String,
}

/// A page of results plus the server's total count, when reported.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

pub struct HarborClient {
    base_url: String,
    auth: RegistryAuth,
    http: reqwest::Client,
}

impl HarborClient {
    pub fn new(base_url: impl Into<String>, auth: RegistryAuth) -> Self {
        let base_url = base_url
            .into()
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            auth,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &RegistryAuth {
        &self.auth
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_BASE,
            path.trim_start_matches('/')
        )
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ApiError> {
        let resp = request
            .apply_authentication(&self.auth)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        match resp.json::<ApiErrorResponse>().await {
            Ok(body) => {
                let message = body
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.code, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(ApiError::Api { status, message })
            }
            Err(_) => Err(ApiError::UnexpectedStatus(status)),
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = self.send(self.http.get(self.endpoint(path))).await?;
        Ok(resp.json::<T>().await?)
    }

    /// GET where Harbor reports "not configured" as an empty body.
    pub async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let resp = self.send(self.http.get(self.endpoint(path))).await?;

        let raw = resp.text().await?;
        if raw.trim().is_empty() || raw.trim() == "null" {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let resp = self.send(self.http.get(self.endpoint(path))).await?;
        Ok(resp.text().await?)
    }

    pub async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u64,
        page_size: u64,
    ) -> Result<Page<T>, ApiError> {
        let request = self
            .http
            .get(self.endpoint(path))
            .query(&[("page", page), ("page_size", page_size)]);

        let resp = self.send(request).await?;

        let total = resp
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());

        let items = resp.json::<Vec<T>>().await?;
        Ok(Page { items, total })
    }

    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    pub async fn post_json_response<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .send(self.http.post(self.endpoint(path)).json(body))
            .await?;
        Ok(resp.json::<T>().await?)
    }

    pub async fn put_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(self.http.put(self.endpoint(path)).json(body))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.http.delete(self.endpoint(path)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_under_the_api_root() {
        let client = HarborClient::new(
            "https://harbor.example.com/",
            RegistryAuth::anonymous(),
        );

        assert_eq!(
            client.endpoint("system/gc/schedule"),
            "https://harbor.example.com/api/v2.0/system/gc/schedule"
        );
        assert_eq!(
            client.endpoint("/health"),
            "https://harbor.example.com/api/v2.0/health"
        );
    }

    #[test]
    fn error_body_parses_into_code_message_pairs() {
        let raw = r#"{"errors":[{"code":"UNAUTHORIZED","message":"invalid credentials"}]}"#;
        let body: ApiErrorResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].code, "UNAUTHORIZED");
        assert_eq!(body.errors[0].message, "invalid credentials");
    }
}
