//! One portal session: load the catalog and FAQ, apply the configured view
//! settings, then optionally run a donation through the workflow.

use std::sync::Arc;

use reqwest::Client;
use tracing::info;

use crate::catalog::{self, ProjectCatalog};
use crate::config::Config;
use crate::donation::{self, DonationWorkflow};
use crate::errors::Result;
use crate::faq::{self, FaqBrowser};
use crate::rates::HttpRateSource;
use crate::render;
use crate::sources::{FaqSource, HttpFaqSource, HttpProjectSource, StaticFaqSource};

pub struct PortalState {
    pub config: Config,
    pub client: Client,
}

pub async fn run(state: Arc<PortalState>) -> Result<()> {
    let config = &state.config;

    let projects = HttpProjectSource::new(state.client.clone(), &config.projects_api_url);
    let faqs: Box<dyn FaqSource> = match &config.faq_api_url {
        Some(url) => Box::new(HttpFaqSource::new(state.client.clone(), url)),
        None => Box::new(StaticFaqSource),
    };

    // The two views are independent; fetch them side by side.
    let mut catalog = ProjectCatalog::new();
    let mut browser = FaqBrowser::new();
    tokio::join!(catalog.load(&projects), browser.load(faqs.as_ref()));

    catalog.handle(catalog::Message::Filter(config.project_category));
    catalog.handle(catalog::Message::Sort(config.project_sort));
    print!("{}", render::catalog(&catalog));

    if let Some(project_id) = config.donate_project_id {
        if let catalog::Effect::DonateRequested(intent) =
            catalog.handle(catalog::Message::Donate(project_id))
        {
            println!("Donate intent: {}", serde_json::to_string(&intent)?);
        }
    }

    browser.handle(faq::Message::Search(config.faq_search.clone()));
    for category in &config.faq_expand {
        browser.handle(faq::Message::ToggleCategory(category.clone()));
    }
    print!("{}", render::faq(&browser));

    if let Some(amount) = &config.donation_amount {
        let rates = HttpRateSource::new(state.client.clone(), &config.rates_api_url);
        let mut workflow = DonationWorkflow::new();
        workflow.handle(donation::Message::SetAmount(amount.clone()));
        workflow.handle(donation::Message::SetCurrency(config.donation_currency));
        workflow.submit(&rates).await;

        if config.confirm_donation {
            if let donation::Effect::Confirmed(receipt) =
                workflow.handle(donation::Message::Confirm)
            {
                println!("Receipt: {}", serde_json::to_string_pretty(&receipt)?);
            }
        }
        print!("{}", render::donation(&workflow));
        info!(
            "Donation workflow finished at step {} (converted: {})",
            workflow.step().number(),
            workflow.converted_amount().as_deref().unwrap_or("none")
        );
    }

    Ok(())
}
