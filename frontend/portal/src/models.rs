//! Data shapes shared by the portal components and their collaborators.
//!
//! Everything here is transient: values live for one session and are owned by
//! exactly one component. Filtering, sorting and grouping are derived views
//! computed from these records, never stored back into them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;

/// Currencies a donor can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Inr,
    Crypto,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Self::Usd, Self::Eur, Self::Inr, Self::Crypto];

    /// Code used as the key in rate-lookup requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Inr => "INR",
            Self::Crypto => "CRYPTO",
        }
    }

    /// Label shown next to converted amounts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Crypto => "Crypto",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PortalError::Config(format!("Unknown currency: {s}")))
    }
}

/// A validated amount paired with the currency it was entered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationRequest {
    pub amount: f64,
    pub currency: Currency,
}

/// Outcome of one successful conversion into the platform unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub source_amount: f64,
    pub source_currency: Currency,
    pub target_currency: Currency,
    pub rate: f64,
    /// `source_amount * rate`, rounded to two decimal places.
    pub converted: f64,
}

impl ConversionResult {
    pub fn new(request: DonationRequest, target: Currency, rate: f64) -> Self {
        Self {
            source_amount: request.amount,
            source_currency: request.currency,
            target_currency: target,
            rate,
            converted: round_cents(request.amount * rate),
        }
    }

    /// Converted amount with exactly two decimals, e.g. `"0.10"`.
    pub fn formatted(&self) -> String {
        format!("{:.2}", self.converted)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Position in the three-step donation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkflowStep {
    /// Collecting amount and currency.
    #[default]
    Collecting = 1,
    /// Converted, awaiting confirmation.
    Converted = 2,
    /// Confirmed by the donor.
    Submitted = 3,
}

impl WorkflowStep {
    pub const TOTAL: u8 = 3;

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// `min(step / 3 * 100, 100)`.
    pub fn percent(&self) -> f64 {
        (f64::from(self.number()) / f64::from(Self::TOTAL) * 100.0).min(100.0)
    }
}

/// Local record produced when a converted donation is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub conversion: ConversionResult,
    pub confirmed_at: DateTime<Utc>,
}

/// A single FAQ item as delivered by the FAQ source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub id: u64,
    pub category: String,
    pub question: String,
    pub answer: String,
    /// Embedded tutorial video shown under the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_url: Option<String>,
}

/// A fundraising project as returned by the projects API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub donation_goal: f64,
    pub current_donations: f64,
    pub currency: String,
}

impl Project {
    /// Share of the goal already raised, in percent. Zero for a zero goal.
    pub fn funded_percent(&self) -> f64 {
        if self.donation_goal > 0.0 {
            self.current_donations / self.donation_goal * 100.0
        } else {
            0.0
        }
    }
}

/// Category selector for the project catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Education,
    Health,
    Environment,
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Education => "education",
            Self::Health => "health",
            Self::Environment => "environment",
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            other => other.as_str() == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "education" => Ok(Self::Education),
            "health" => Ok(Self::Health),
            "environment" => Ok(Self::Environment),
            other => Err(PortalError::Config(format!("Unknown project category: {other}"))),
        }
    }
}

/// Ordering of the catalog by donation goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(PortalError::Config(format!("Unknown sort order: {other}"))),
        }
    }
}

/// Intent emitted by the catalog's "Donate Now" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationIntent {
    pub project_id: u64,
    pub project_name: String,
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_codes() {
        assert_eq!(Currency::Usd.as_str(), "USD");
        assert_eq!(Currency::Crypto.label(), "Crypto");
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert!("GBP".parse::<Currency>().is_err());
    }

    #[test]
    fn conversion_rounds_to_cents() {
        let request = DonationRequest {
            amount: 50.0,
            currency: Currency::Usd,
        };
        let result = ConversionResult::new(request, Currency::Crypto, 0.002);
        assert_eq!(result.formatted(), "0.10");

        let request = DonationRequest {
            amount: 10.0,
            currency: Currency::Eur,
        };
        let result = ConversionResult::new(request, Currency::Crypto, 0.12345);
        assert_eq!(result.converted, 1.23);
    }

    #[test]
    fn step_percentages() {
        assert_eq!(WorkflowStep::Collecting.number(), 1);
        assert!((WorkflowStep::Collecting.percent() - 33.333).abs() < 0.01);
        assert!((WorkflowStep::Converted.percent() - 66.666).abs() < 0.01);
        assert_eq!(WorkflowStep::Submitted.percent(), 100.0);
    }

    #[test]
    fn project_deserializes_camel_case() {
        let json = r#"{"id":7,"name":"Wells","category":"health",
            "donationGoal":1000,"currentDonations":250,"currency":"USD"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.donation_goal, 1000.0);
        assert_eq!(project.funded_percent(), 25.0);
    }

    #[test]
    fn receipts_and_intents_serialize_camel_case() {
        let request = DonationRequest {
            amount: 50.0,
            currency: Currency::Usd,
        };
        let receipt = DonationReceipt {
            conversion: ConversionResult::new(request, Currency::Crypto, 0.002),
            confirmed_at: Utc::now(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("confirmedAt").is_some());
        assert_eq!(json["conversion"]["sourceCurrency"], "USD");
        assert_eq!(json["conversion"]["targetCurrency"], "CRYPTO");
        assert!(json["conversion"].get("source_amount").is_none());

        let intent = DonationIntent {
            project_id: 3,
            project_name: "Wells".to_string(),
            requested_at: Utc::now(),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["projectId"], 3);
        assert_eq!(json["projectName"], "Wells");
        assert!(json.get("requestedAt").is_some());
    }

    #[test]
    fn category_filter_matching() {
        assert!(CategoryFilter::All.matches("anything"));
        assert!(CategoryFilter::Health.matches("health"));
        assert!(!CategoryFilter::Health.matches("education"));
        assert_eq!("Desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }
}
