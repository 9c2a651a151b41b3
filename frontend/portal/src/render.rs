//! Plain-text rendering of component state.

use crate::catalog::{CatalogView, ProjectCatalog};
use crate::donation::{DonationWorkflow, TARGET_CURRENCY};
use crate::faq::FaqBrowser;

const BAR_WIDTH: usize = 30;

pub fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

pub fn donation(workflow: &DonationWorkflow) -> String {
    let mut lines = vec![
        progress_bar(workflow.progress_percent()),
        format!(
            "Donation Amount: {} {}",
            workflow.amount_input(),
            workflow.currency()
        ),
    ];
    if let Some(error) = workflow.error() {
        lines.push(format!("Error: {error}"));
    }
    if workflow.is_loading() {
        lines.push("Loading...".to_string());
    }
    if let Some(conversion) = workflow.conversion() {
        lines.push(format!(
            "Converted Amount: {} in {}",
            conversion.formatted(),
            TARGET_CURRENCY.label()
        ));
        lines.push(format!(
            "    (1 {} = {} {})",
            conversion.source_currency, conversion.rate, conversion.target_currency
        ));
    }
    block(lines)
}

pub fn faq(browser: &FaqBrowser) -> String {
    let mut lines = vec!["Frequently Asked Questions".to_string()];
    if browser.is_loading() {
        lines.push("Loading...".to_string());
    }
    if let Some(error) = browser.error() {
        lines.push(error.to_string());
    }
    if !browser.search_term().is_empty() {
        lines.push(format!("Search: {}", browser.search_term()));
    }
    for category in browser.categories() {
        let marker = if browser.is_expanded(category) { "-" } else { "+" };
        lines.push(format!("{marker} {category}"));
        for entry in browser.entries_for(category) {
            lines.push(format!("    Q: {}", entry.question));
            lines.push(format!("    A: {}", entry.answer));
            if let Some(url) = &entry.tutorial_url {
                lines.push(format!("    Tutorial: {url}"));
            }
        }
    }
    block(lines)
}

pub fn catalog(catalog: &ProjectCatalog) -> String {
    match catalog.view() {
        CatalogView::Loading => "Loading projects...\n".to_string(),
        CatalogView::Failed(message) => format!("{message}\n"),
        CatalogView::Ready(projects) => {
            let mut lines = vec![format!(
                "Projects ({} of {}, category: {}, goal: {})",
                projects.len(),
                catalog.projects().len(),
                catalog.filter().as_str(),
                catalog.sort().as_str()
            )];
            for p in projects {
                lines.push(format!("#{} {} [{}]", p.id, p.name, p.category));
                lines.push(format!("    Goal: {} {}", p.donation_goal, p.currency));
                lines.push(format!(
                    "    Current Donations: {} {} ({:.0}% funded)",
                    p.current_donations,
                    p.currency,
                    p.funded_percent()
                ));
            }
            block(lines)
        }
    }
}

/// One line per entry, each newline-terminated.
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
