//! Donation workflow: amount entry, conversion to the platform unit and
//! confirmation.
//!
//! ## Steps
//!
//! ```text
//! Collecting ──(rate fetched)──► Converted ──(confirm)──► Submitted
//!     ▲   │                        │   ▲
//!     └───┘ failed conversion      └───┘ re-submit converts again
//! ```
//!
//! The step never moves backwards. A failed conversion leaves it where it was
//! and surfaces [`CONVERSION_FAILED`]; the donor recovers by submitting again.
//!
//! State changes go through [`DonationWorkflow::handle`], which never awaits.
//! `Submit` returns an [`Effect::FetchRate`] carrying the request token; the
//! caller performs the lookup and feeds the outcome back as
//! [`Message::RateFetched`]. [`DonationWorkflow::submit`] does both for
//! callers that just want to await the result.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{PortalError, Result};
use crate::guard::{InFlight, RequestToken};
use crate::models::{ConversionResult, Currency, DonationReceipt, DonationRequest, WorkflowStep};
use crate::rates::RateSource;

pub const INVALID_AMOUNT: &str = "Please enter a valid donation amount.";
pub const CONVERSION_FAILED: &str = "Failed to fetch conversion rates. Please try again.";

/// Unit every donation is converted into.
pub const TARGET_CURRENCY: Currency = Currency::Crypto;

#[derive(Debug)]
pub enum Message {
    /// Raw text from the amount field, kept verbatim.
    SetAmount(String),
    SetCurrency(Currency),
    Submit,
    RateFetched {
        token: RequestToken,
        request: DonationRequest,
        result: Result<f64>,
    },
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Look up the rate for `request.currency`, then send `RateFetched`.
    FetchRate {
        token: RequestToken,
        request: DonationRequest,
    },
    Converted(ConversionResult),
    Confirmed(DonationReceipt),
}

#[derive(Debug, Default)]
pub struct DonationWorkflow {
    amount_input: String,
    currency: Currency,
    conversion: Option<ConversionResult>,
    step: WorkflowStep,
    in_flight: InFlight,
    error: Option<String>,
}

impl DonationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::SetAmount(raw) => {
                self.amount_input = raw;
                Effect::None
            }
            Message::SetCurrency(currency) => {
                self.currency = currency;
                Effect::None
            }
            Message::Submit => self.begin_conversion(),
            Message::RateFetched {
                token,
                request,
                result,
            } => self.finish_conversion(token, request, result),
            Message::Confirm => self.confirm(),
        }
    }

    /// Check the raw amount. Sets [`INVALID_AMOUNT`] on failure and clears any
    /// previous error on success.
    pub fn validate(&mut self) -> bool {
        match parse_amount(&self.amount_input) {
            Ok(_) => {
                self.error = None;
                true
            }
            Err(e) => {
                debug!("Rejected amount: {e}");
                self.error = Some(INVALID_AMOUNT.to_string());
                false
            }
        }
    }

    /// Validate, fetch the rate and apply it.
    pub async fn submit(&mut self, rates: &dyn RateSource) -> Effect {
        let Effect::FetchRate { token, request } = self.handle(Message::Submit) else {
            return Effect::None;
        };
        let result = rates.rate(request.currency, TARGET_CURRENCY).await;
        self.handle(Message::RateFetched {
            token,
            request,
            result,
        })
    }

    fn begin_conversion(&mut self) -> Effect {
        if self.step == WorkflowStep::Submitted {
            warn!("Donation already confirmed; ignoring submit");
            return Effect::None;
        }
        if self.in_flight.is_active() {
            debug!("Submit ignored: conversion already in flight");
            return Effect::None;
        }
        if !self.validate() {
            return Effect::None;
        }
        let Ok(amount) = parse_amount(&self.amount_input) else {
            return Effect::None;
        };
        let Some(token) = self.in_flight.try_begin() else {
            return Effect::None;
        };

        let request = DonationRequest {
            amount,
            currency: self.currency,
        };
        info!("Converting {} {} to {}", request.amount, request.currency, TARGET_CURRENCY);
        Effect::FetchRate { token, request }
    }

    fn finish_conversion(
        &mut self,
        token: RequestToken,
        request: DonationRequest,
        result: Result<f64>,
    ) -> Effect {
        if !self.in_flight.settle(token) {
            debug!("Dropping stale conversion result");
            return Effect::None;
        }

        match result {
            Ok(rate) => {
                let conversion = ConversionResult::new(request, TARGET_CURRENCY, rate);
                info!(
                    "Converted {} {} at {rate} -> {} {}",
                    request.amount,
                    request.currency,
                    conversion.formatted(),
                    TARGET_CURRENCY
                );
                self.conversion = Some(conversion.clone());
                self.step = self.step.max(WorkflowStep::Converted);
                Effect::Converted(conversion)
            }
            Err(e) => {
                warn!("Conversion from {} failed: {e}", request.currency);
                self.error = Some(CONVERSION_FAILED.to_string());
                Effect::None
            }
        }
    }

    fn confirm(&mut self) -> Effect {
        if self.step != WorkflowStep::Converted || self.in_flight.is_active() {
            warn!("Confirm ignored at step {}", self.step.number());
            return Effect::None;
        }
        let Some(conversion) = self.conversion.clone() else {
            return Effect::None;
        };
        self.step = WorkflowStep::Submitted;
        let receipt = DonationReceipt {
            conversion,
            confirmed_at: Utc::now(),
        };
        info!(
            "Donation confirmed: {} {}",
            receipt.conversion.formatted(),
            receipt.conversion.target_currency
        );
        Effect::Confirmed(receipt)
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    /// Progress bar fill, derived from the step alone.
    pub fn progress_percent(&self) -> f64 {
        self.step.percent()
    }

    pub fn conversion(&self) -> Option<&ConversionResult> {
        self.conversion.as_ref()
    }

    /// Converted amount as displayed, e.g. `"0.10"`.
    pub fn converted_amount(&self) -> Option<String> {
        self.conversion.as_ref().map(ConversionResult::formatted)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Parse a raw amount: numeric, finite and strictly positive.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PortalError::Validation(format!("not a number: {raw:?}")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PortalError::Validation(format!("not a positive amount: {raw:?}")));
    }
    Ok(amount)
}
