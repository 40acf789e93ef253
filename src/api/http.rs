use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode, Url};

use super::{Account, AccountApi, AccountId};
use crate::error::ApiError;

/// [`AccountApi`] over the admin REST endpoints `{base}/accounts/{id}`.
pub struct HttpAccountApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpAccountApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Unavailable(format!("invalid api url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Unavailable(format!("invalid api url '{base_url}'")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("account-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Resource URL for one account; the id is percent-encoded as a path segment.
    pub fn account_url(&self, id: &AccountId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("accounts").push(id.as_str());
        }
        url
    }

    fn request(&self, method: Method, id: &AccountId) -> RequestBuilder {
        let builder = self.client.request(method, self.account_url(id));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn check(resp: Response, id: &AccountId) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }
        let body = resp.text().unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("request rejected").to_string()
        } else {
            body.trim().to_string()
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl AccountApi for HttpAccountApi {
    fn fetch_account(&self, id: &AccountId) -> Result<Account, ApiError> {
        tracing::debug!(%id, "GET account");
        let resp = Self::check(self.request(Method::GET, id).send()?, id)?;
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn update_account(&self, id: &AccountId, account: &Account) -> Result<Account, ApiError> {
        tracing::debug!(%id, "PUT account");
        let resp = Self::check(self.request(Method::PUT, id).json(account).send()?, id)?;
        let body = resp.text()?;
        // Some deployments answer 204 or an empty 200; keep what we sent.
        if body.trim().is_empty() {
            return Ok(account.clone());
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn delete_account(&self, id: &AccountId) -> Result<(), ApiError> {
        tracing::debug!(%id, "DELETE account");
        Self::check(self.request(Method::DELETE, id).send()?, id)?;
        Ok(())
    }
}
