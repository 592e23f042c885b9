use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{
    error::TransportError,
    traits::CatalogApi,
    types::book::{BookEntry, BookId},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/livros";

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http:     reqwest::Client,
    base_url: String,
}

/// Request body for create and update. The id travels in the path, never in the body.
#[derive(Serialize)]
struct Payload<'a> {
    nome:    &'a str,
    genero:  &'a str,
    paginas: i64,
    foto:    &'a str,
}

impl<'a> From<&'a BookEntry> for Payload<'a> {
    fn from(entry: &'a BookEntry) -> Self {
        Self {
            nome:    &entry.title,
            genero:  &entry.genre,
            paginas: entry.page_count,
            foto:    &entry.cover_url,
        }
    }
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&BookEntry>,
    ) -> Result<Response, TransportError> {
        let url = self.url(path);
        debug!("{method} {url}");
        let mut request = self.http.request(method.clone(), &url);
        if let Some(entry) = body {
            request = request.json(&Payload::from(entry));
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{method} {url} returned {status}");
            return Err(TransportError::Status {
                method,
                url,
                status,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
        let bytes = response.bytes().await?;
        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        Ok(serde_path_to_error::deserialize(deserializer)?)
    }
}

impl CatalogApi for CatalogClient {
    async fn list(&self) -> Result<Vec<BookEntry>, TransportError> {
        let response = self.send(Method::GET, "listarLivros", None).await?;
        Self::decode(response).await
    }

    async fn create(&self, entry: &BookEntry) -> Result<BookEntry, TransportError> {
        let response = self
            .send(Method::POST, "cadastrarLivro", Some(entry))
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, id: BookId, entry: &BookEntry) -> Result<BookEntry, TransportError> {
        let response = self
            .send(Method::PUT, &format!("atualizarLivro/{id}"), Some(entry))
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: BookId) -> Result<(), TransportError> {
        self.send(Method::DELETE, &format!("deletarLivro/{id}"), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_on_base_url_is_ignored() {
        let client = CatalogClient::new("http://localhost:8080/api/livros/");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            client.url("deletarLivro/3"),
            "http://localhost:8080/api/livros/deletarLivro/3"
        );
    }
}
