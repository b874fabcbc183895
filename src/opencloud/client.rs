//! Open Cloud groups API client.
//!
//! # Responsibilities
//! - Build authenticated requests (`x-api-key`)
//! - Follow role list pagination to the end
//! - Translate non-2xx answers into `OpenCloudError::Api`

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::OpenCloudConfig;
use crate::opencloud::types::{
    ApiErrorBody, GroupMembership, GroupRole, ListGroupRolesResponse, OpenCloudError,
    OpenCloudResult,
};
use crate::opencloud::GroupsApi;

const API_KEY_HEADER: &str = "x-api-key";
const ROLES_PAGE_SIZE: u32 = 20;

/// `reqwest`-backed implementation of [`GroupsApi`].
#[derive(Clone)]
pub struct OpenCloudClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl OpenCloudClient {
    /// Create a client from the Open Cloud configuration section.
    pub fn new(config: &OpenCloudConfig) -> OpenCloudResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| OpenCloudError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(OpenCloudError::InvalidUrl(config.base_url.clone()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Resolve `cloud/v2/<segments...>` against the base URL.
    fn endpoint<'a, I>(&self, segments: I) -> OpenCloudResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| OpenCloudError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["cloud", "v2"])
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> OpenCloudResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
            let message = body
                .message
                .or(body.code)
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        text
                    }
                });
            return Err(OpenCloudError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GroupsApi for OpenCloudClient {
    async fn list_group_roles(&self, group_id: &str) -> OpenCloudResult<Vec<GroupRole>> {
        let mut roles = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut url = self.endpoint(["groups", group_id, "roles"])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("maxPageSize", &ROLES_PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: ListGroupRolesResponse = self.send(self.request(Method::GET, url)).await?;
            roles.extend(page.group_roles);

            // A token handed out twice would loop forever.
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if seen_tokens.insert(token.clone()) => {
                    page_token = Some(token);
                }
                Some(token) => {
                    tracing::warn!(group_id = %group_id, page_token = %token, "Role pagination repeated a token");
                    break;
                }
                None => break,
            }
        }

        tracing::debug!(group_id = %group_id, roles = roles.len(), "Listed group roles");
        Ok(roles)
    }

    async fn update_group_membership(
        &self,
        group_id: &str,
        user_id: &str,
        role: &str,
    ) -> OpenCloudResult<GroupMembership> {
        let url = self.endpoint(["groups", group_id, "memberships", user_id])?;
        let body = serde_json::json!({ "role": role });

        self.send(self.request(Method::PATCH, url).json(&body)).await
    }
}
