//! Access to the document service.
//!
//! [`DocumentsApi`] is the seam between client state and the network. [`HttpDocumentsApi`]
//! talks to the REST server; tests substitute an in-process implementation.

use crate::config::ClientConfig;
use crate::{ClientError, ClientResult};
use api_shared::{DocumentReq, DocumentRes, ErrorRes, MessageRes};
use async_trait::async_trait;
use quill_types::{Document, DocumentFields, DocumentId};
use reqwest::{Response, StatusCode, Url};

/// The four operations the client needs from the document service.
#[async_trait]
pub trait DocumentsApi: Send + Sync {
    async fn list_all(&self) -> ClientResult<Vec<Document>>;

    async fn create(&self, fields: &DocumentFields) -> ClientResult<Document>;

    async fn update_by_id(&self, id: &DocumentId, fields: &DocumentFields)
        -> ClientResult<Document>;

    async fn delete_by_id(&self, id: &DocumentId) -> ClientResult<()>;
}

/// [`DocumentsApi`] over HTTP with JSON bodies.
#[derive(Clone, Debug)]
pub struct HttpDocumentsApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDocumentsApi {
    /// Create a client for the API at `cfg.base_url()`.
    ///
    /// # Errors
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn new(cfg: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: cfg.base_url().clone(),
        })
    }

    /// `<base>/documents`, plus `/<id>` when given. The id is percent-encoded as one segment.
    fn url(&self, id: Option<&DocumentId>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::Network(format!("API URL cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty().push("documents");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    /// Turn a non-success response into the matching error.
    async fn check(resp: Response, id: Option<&DocumentId>) -> ClientResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ClientError::NotFound(id.clone()));
            }
        }

        let message = match resp.json::<ErrorRes>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Service {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(resp: Response) -> ClientResult<T> {
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Network(format!("unreadable response: {e}")))
    }
}

fn send_error(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

#[async_trait]
impl DocumentsApi for HttpDocumentsApi {
    async fn list_all(&self) -> ClientResult<Vec<Document>> {
        let url = self.url(None)?;
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().await.map_err(send_error)?;
        let resp = Self::check(resp, None).await?;
        let body: Vec<DocumentRes> = Self::read_json(resp).await?;
        Ok(body.into_iter().map(Document::from).collect())
    }

    async fn create(&self, fields: &DocumentFields) -> ClientResult<Document> {
        let url = self.url(None)?;
        tracing::debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .json(&DocumentReq::from(fields))
            .send()
            .await
            .map_err(send_error)?;
        let resp = Self::check(resp, None).await?;
        let body: DocumentRes = Self::read_json(resp).await?;
        Ok(body.into())
    }

    async fn update_by_id(
        &self,
        id: &DocumentId,
        fields: &DocumentFields,
    ) -> ClientResult<Document> {
        let url = self.url(Some(id))?;
        tracing::debug!("PUT {}", url);
        let resp = self
            .client
            .put(url)
            .json(&DocumentReq::from(fields))
            .send()
            .await
            .map_err(send_error)?;
        let resp = Self::check(resp, Some(id)).await?;
        let body: DocumentRes = Self::read_json(resp).await?;
        Ok(body.into())
    }

    async fn delete_by_id(&self, id: &DocumentId) -> ClientResult<()> {
        let url = self.url(Some(id))?;
        tracing::debug!("DELETE {}", url);
        let resp = self.client.delete(url).send().await.map_err(send_error)?;
        let resp = Self::check(resp, Some(id)).await?;
        let _: MessageRes = Self::read_json(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api(base: &str) -> HttpDocumentsApi {
        let cfg = ClientConfig::new(base, Duration::from_secs(1)).unwrap();
        HttpDocumentsApi::new(&cfg).unwrap()
    }

    #[test]
    fn test_collection_url() {
        let api = api("http://localhost:3000/api");
        assert_eq!(
            api.url(None).unwrap().as_str(),
            "http://localhost:3000/api/documents"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_is_ignored() {
        let api = api("http://localhost:3000/api/");
        assert_eq!(
            api.url(Some(&DocumentId::new("abc"))).unwrap().as_str(),
            "http://localhost:3000/api/documents/abc"
        );
    }

    #[test]
    fn test_id_is_encoded_as_single_segment() {
        let api = api("http://localhost:3000/api");
        let url = api.url(Some(&DocumentId::new("a/b c"))).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/documents/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections on the test host.
        let api = api("http://127.0.0.1:9/api");
        let err = api.list_all().await.expect_err("nothing listens there");
        assert!(matches!(err, ClientError::Network(_)));
    }
}
