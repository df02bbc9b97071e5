use crate::config::ClientConfig;
use crate::errors::{extract_detail, ClientError};
use crate::storage::ClientStorage;
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: ClientStorage,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, storage: ClientStorage) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn storage(&self) -> &ClientStorage {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.load_credential().await {
            Some(credential) => request.bearer_auth(credential.access_token),
            None => request,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        self.send(self.http.get(self.url(path)).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.http.post(self.url(path))).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self
            .authorize(self.http.delete(self.url(path)))
            .await
            .send()
            .await
            .map_err(ClientError::network)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(ClientError::network)?;

        handle_response(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let body = response.bytes().await.map_err(ClientError::network)?;
    serde_json::from_slice(&body).map_err(ClientError::decode)
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    debug!(status, path = %url, "api request failed");
    ClientError::from_status(status, extract_detail(&body))
}
