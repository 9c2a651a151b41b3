//! Project and FAQ collaborators.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::Result;
use crate::models::{FaqEntry, Project};

#[async_trait]
pub trait ProjectSource: Send + Sync {
    /// The full project list, in the order the API returns it.
    async fn projects(&self) -> Result<Vec<Project>>;
}

#[async_trait]
pub trait FaqSource: Send + Sync {
    /// The full FAQ set, in display order.
    async fn faqs(&self) -> Result<Vec<FaqEntry>>;
}

/// `GET` a JSON array from a fixed URL.
async fn fetch_list<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<Vec<T>> {
    debug!("GET {url}");
    let items: Vec<T> = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(items)
}

pub struct HttpProjectSource {
    client: Client,
    url: String,
}

impl HttpProjectSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ProjectSource for HttpProjectSource {
    async fn projects(&self) -> Result<Vec<Project>> {
        fetch_list(&self.client, &self.url).await
    }
}

pub struct HttpFaqSource {
    client: Client,
    url: String,
}

impl HttpFaqSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl FaqSource for HttpFaqSource {
    async fn faqs(&self) -> Result<Vec<FaqEntry>> {
        fetch_list(&self.client, &self.url).await
    }
}

const TUTORIAL_EMBED_URL: &str = "https://www.youtube.com/embed/example";

/// Built-in FAQ set used when no FAQ endpoint is configured.
#[derive(Debug, Default)]
pub struct StaticFaqSource;

#[async_trait]
impl FaqSource for StaticFaqSource {
    async fn faqs(&self) -> Result<Vec<FaqEntry>> {
        Ok(vec![
            FaqEntry {
                id: 1,
                category: "Donations".to_string(),
                question: "How can I donate?".to_string(),
                answer: "You can donate by selecting a project and completing the donation form."
                    .to_string(),
                tutorial_url: Some(TUTORIAL_EMBED_URL.to_string()),
            },
            FaqEntry {
                id: 2,
                category: "Security".to_string(),
                question: "Is my data secure?".to_string(),
                answer: "Yes, we implement industry-standard security measures to protect your data."
                    .to_string(),
                tutorial_url: Some(TUTORIAL_EMBED_URL.to_string()),
            },
        ])
    }
}
