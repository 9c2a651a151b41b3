//! Application configuration loaded from environment variables.

use crate::errors::{PortalError, Result};
use crate::models::{CategoryFilter, Currency, SortOrder};

#[derive(Debug, Clone)]
pub struct Config {
    /// Rate-lookup base URL; the source currency code is appended as a path segment
    pub rates_api_url: String,
    /// Endpoint returning the full project list
    pub projects_api_url: String,
    /// FAQ endpoint; the built-in FAQ set is used when unset
    pub faq_api_url: Option<String>,
    /// Timeout applied to every outbound request
    pub request_timeout_secs: u64,
    /// Raw donation amount to run through the workflow, if any
    pub donation_amount: Option<String>,
    pub donation_currency: Currency,
    /// Confirm the donation once it has been converted
    pub confirm_donation: bool,
    pub faq_search: String,
    /// FAQ categories to expand
    pub faq_expand: Vec<String>,
    pub project_category: CategoryFilter,
    pub project_sort: SortOrder,
    /// Project to fire the donate action for
    pub donate_project_id: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            rates_api_url: var("RATES_API_URL")
                .unwrap_or_else(|| "https://api.exchangerate-api.com/v4/latest".to_string()),
            projects_api_url: var("PROJECTS_API_URL")
                .unwrap_or_else(|| "http://localhost:3000/api/projects".to_string()),
            faq_api_url: var("FAQ_API_URL"),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| PortalError::Config("Invalid REQUEST_TIMEOUT_SECS".to_string()))?,
            donation_amount: var("DONATION_AMOUNT"),
            donation_currency: var("DONATION_CURRENCY")
                .unwrap_or_else(|| "USD".to_string())
                .parse()?,
            confirm_donation: var("CONFIRM_DONATION")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .map_err(|_| PortalError::Config("Invalid CONFIRM_DONATION".to_string()))?,
            faq_search: var("FAQ_SEARCH").unwrap_or_default(),
            faq_expand: var("FAQ_EXPAND")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            project_category: var("PROJECT_CATEGORY")
                .unwrap_or_else(|| "all".to_string())
                .parse()?,
            project_sort: var("PROJECT_SORT")
                .unwrap_or_else(|| "asc".to_string())
                .parse()?,
            donate_project_id: var("DONATE_PROJECT_ID")
                .map(|id| {
                    id.trim()
                        .parse()
                        .map_err(|_| PortalError::Config("Invalid DONATE_PROJECT_ID".to_string()))
                })
                .transpose()?,
        })
    }
}
