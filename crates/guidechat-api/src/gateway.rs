//! Backend gateway: the three request/reply exchanges the chat client makes

use crate::{
    error::{Error, Result},
    types::{
        AskResponse, BackendReply, FaqAnswer, FaqResponse, LanguageCode, QuestionRequest,
        SearchRequest, SearchResponse, SearchResults,
    },
};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

/// Path of the primary question endpoint
pub const ASK_PATH: &str = "ask";
/// Path of the FAQ answer endpoint
pub const FAQ_ANSWER_PATH: &str = "faq_answer";
/// Path of the external search endpoint
pub const SEARCH_PATH: &str = "google_search";

/// Longest search query the backend accepts, in characters
pub const MAX_SEARCH_QUERY_CHARS: usize = 500;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for anything that can answer chat questions.
///
/// Each call is a single request/reply exchange. Implementations never retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Ask the primary endpoint
    async fn ask(&self, question: &str, language: &LanguageCode) -> Result<BackendReply>;

    /// Fetch the stored answer for a suggested FAQ question
    async fn answer_faq(&self, question: &str, language: &LanguageCode) -> Result<FaqAnswer>;

    /// Run an external web search
    async fn search(&self, query: &str, language: &LanguageCode) -> Result<SearchResults>;
}

/// JSON-over-HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    ask_url: Url,
    faq_url: Url,
    search_url: Url,
}

impl HttpGateway {
    /// Create a gateway for the backend at `base_url` with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a gateway with a custom per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a gateway around an existing client
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", base_url, e)))
        };

        Ok(Self {
            ask_url: join(ASK_PATH)?,
            faq_url: join(FAQ_ANSWER_PATH)?,
            search_url: join(SEARCH_PATH)?,
            client,
        })
    }

    async fn post<B, R>(&self, url: &Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        tracing::debug!(%url, "POST");

        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "backend returned an error status");
            return Err(Error::status(status.as_u16(), text));
        }

        // Decode separately so a bad body is reported as malformed, not as a transport error
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(%url, error = %e, "malformed backend response");
            Error::Json(e)
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn ask(&self, question: &str, language: &LanguageCode) -> Result<BackendReply> {
        let body = QuestionRequest { question, language };
        let response: AskResponse = self.post(&self.ask_url, &body).await?;
        Ok(response.into())
    }

    async fn answer_faq(&self, question: &str, language: &LanguageCode) -> Result<FaqAnswer> {
        let body = QuestionRequest { question, language };
        let response: FaqResponse = self.post(&self.faq_url, &body).await?;
        Ok(response.into())
    }

    async fn search(&self, query: &str, language: &LanguageCode) -> Result<SearchResults> {
        let body = SearchRequest {
            query: truncate_query(query),
            language,
        };
        let response: SearchResponse = self.post(&self.search_url, &body).await?;
        response.into_results().inspect_err(|e| {
            tracing::warn!(url = %self.search_url, error = %e, "search failed on the backend");
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidBaseUrl(base_url.to_string()));
    }

    // Endpoint paths are joined relative to the base, which needs a trailing slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Cut a search query down to what the backend accepts
pub fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(MAX_SEARCH_QUERY_CHARS) {
        Some((idx, _)) => &query[..idx],
        None => query,
    }
}
