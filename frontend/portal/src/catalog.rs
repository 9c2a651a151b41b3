//! Project catalog: category filter, goal ordering and the per-project
//! donate action.
//!
//! The fetched list is never reordered or pruned. [`ProjectCatalog::visible`]
//! filters first, then sorts the surviving references with a stable sort, so
//! projects with equal goals keep their API order in both directions.

use std::cmp::Ordering;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::Result;
use crate::guard::{InFlight, RequestToken};
use crate::models::{CategoryFilter, DonationIntent, Project, SortOrder};
use crate::sources::ProjectSource;

pub const LOAD_FAILED: &str = "Failed to load projects.";

#[derive(Debug)]
pub enum Message {
    Load,
    Loaded {
        token: RequestToken,
        result: Result<Vec<Project>>,
    },
    Filter(CategoryFilter),
    Sort(SortOrder),
    Donate(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchProjects(RequestToken),
    DonateRequested(DonationIntent),
}

/// What the catalog shows right now.
#[derive(Debug, PartialEq)]
pub enum CatalogView<'a> {
    Loading,
    /// The whole view is replaced by this message.
    Failed(&'a str),
    Ready(Vec<&'a Project>),
}

#[derive(Debug)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
    loading: bool,
    in_flight: InFlight,
    error: Option<String>,
    filter: CategoryFilter,
    sort: SortOrder,
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectCatalog {
    /// A catalog starts out loading; the flag drops once the fetch settles.
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            loading: true,
            in_flight: InFlight::default(),
            error: None,
            filter: CategoryFilter::default(),
            sort: SortOrder::default(),
        }
    }

    pub fn handle(&mut self, msg: Message) -> Effect {
        match msg {
            Message::Load => {
                if !self.loading {
                    return Effect::None;
                }
                match self.in_flight.try_begin() {
                    Some(token) => Effect::FetchProjects(token),
                    None => Effect::None,
                }
            }
            Message::Loaded { token, result } => {
                if !self.in_flight.settle(token) {
                    return Effect::None;
                }
                self.loading = false;
                match result {
                    Ok(projects) => {
                        info!("Loaded {} projects", projects.len());
                        self.projects = projects;
                    }
                    Err(e) => {
                        warn!("Project load failed: {e}");
                        self.error = Some(LOAD_FAILED.to_string());
                    }
                }
                Effect::None
            }
            Message::Filter(filter) => {
                self.filter = filter;
                Effect::None
            }
            Message::Sort(sort) => {
                self.sort = sort;
                Effect::None
            }
            Message::Donate(project_id) => self.donate(project_id),
        }
    }

    /// Fetch the project list once.
    pub async fn load(&mut self, source: &dyn ProjectSource) {
        let Effect::FetchProjects(token) = self.handle(Message::Load) else {
            return;
        };
        let result = source.projects().await;
        self.handle(Message::Loaded { token, result });
    }

    fn donate(&self, project_id: u64) -> Effect {
        let Some(project) = self.projects.iter().find(|p| p.id == project_id) else {
            warn!("Donate requested for unknown project {project_id}");
            return Effect::None;
        };
        info!("Donating to project ID: {project_id}");
        Effect::DonateRequested(DonationIntent {
            project_id,
            project_name: project.name.clone(),
            requested_at: Utc::now(),
        })
    }

    /// Projects matching the filter, ordered by donation goal.
    pub fn visible(&self) -> Vec<&Project> {
        let mut shown: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| self.filter.matches(&p.category))
            .collect();
        match self.sort {
            SortOrder::Asc => shown.sort_by(|a, b| by_goal(a, b)),
            SortOrder::Desc => shown.sort_by(|a, b| by_goal(b, a)),
        }
        shown
    }

    pub fn view(&self) -> CatalogView<'_> {
        if self.is_loading() {
            CatalogView::Loading
        } else if let Some(error) = &self.error {
            CatalogView::Failed(error)
        } else {
            CatalogView::Ready(self.visible())
        }
    }

    /// The list as fetched.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Equal goals (including `0.0` against `-0.0`) compare equal so the stable
/// sort keeps their source order.
fn by_goal(a: &Project, b: &Project) -> Ordering {
    a.donation_goal
        .partial_cmp(&b.donation_goal)
        .unwrap_or(Ordering::Equal)
}
