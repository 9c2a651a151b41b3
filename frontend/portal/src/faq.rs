//! FAQ browser: category grouping with expand/collapse and question search.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::guard::{InFlight, RequestToken};
use crate::models::FaqEntry;
use crate::sources::FaqSource;

pub const LOAD_FAILED: &str = "Failed to load FAQs.";

#[derive(Debug)]
pub enum Message {
    Load,
    Loaded {
        token: RequestToken,
        result: Result<Vec<FaqEntry>>,
    },
    Search(String),
    ToggleCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    FetchFaqs(RequestToken),
}

#[derive(Debug, Default)]
pub struct FaqBrowser {
    faqs: Vec<FaqEntry>,
    loaded: bool,
    in_flight: InFlight,
    error: Option<String>,
    search_term: String,
    expanded: HashMap<String, bool>,
}

impl FaqBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Load => {
                if self.loaded {
                    debug!("FAQs already loaded");
                    return Effect::None;
                }
                match self.in_flight.try_begin() {
                    Some(token) => Effect::FetchFaqs(token),
                    None => Effect::None,
                }
            }
            Message::Loaded { token, result } => {
                if !self.in_flight.settle(token) {
                    return Effect::None;
                }
                self.loaded = true;
                match result {
                    Ok(faqs) => {
                        info!("Loaded {} FAQ entries", faqs.len());
                        self.faqs = faqs;
                    }
                    Err(e) => {
                        warn!("FAQ load failed: {e}");
                        self.error = Some(LOAD_FAILED.to_string());
                    }
                }
                Effect::None
            }
            Message::Search(term) => {
                self.search_term = term;
                Effect::None
            }
            Message::ToggleCategory(category) => {
                let flag = self.expanded.entry(category).or_default();
                *flag = !*flag;
                Effect::None
            }
        }
    }

    /// Fetch the FAQ set on first call; later calls do nothing.
    pub async fn load(&mut self, source: &dyn FaqSource) {
        let Effect::FetchFaqs(token) = self.handle(Message::Load) else {
            return;
        };
        let result = source.faqs().await;
        self.handle(Message::Loaded { token, result });
    }

    /// Entries whose question contains the search term, ignoring case.
    /// An empty term yields the full set in source order.
    pub fn filtered_faqs(&self) -> Vec<&FaqEntry> {
        if self.search_term.is_empty() {
            return self.faqs.iter().collect();
        }
        let needle = self.search_term.to_lowercase();
        self.faqs
            .iter()
            .filter(|faq| faq.question.to_lowercase().contains(&needle))
            .collect()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.faqs
            .iter()
            .map(|faq| faq.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    pub fn is_expanded(&self, category: &str) -> bool {
        self.expanded.get(category).copied().unwrap_or(false)
    }

    /// Filtered entries shown under `category`; empty while it is collapsed.
    pub fn entries_for(&self, category: &str) -> Vec<&FaqEntry> {
        if !self.is_expanded(category) {
            return Vec::new();
        }
        self.filtered_faqs()
            .into_iter()
            .filter(|faq| faq.category == category)
            .collect()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
