//! Per-session view state and its reducer.
//!
//! `reduce` never mutates its input: every action yields a fresh `ViewState`, and all derived
//! values (summaries, cards) are recomputed from the state that comes out.

use serde::{Deserialize, Serialize};

use crate::dashboard::backlog::BacklogBoard;
use crate::models::analysis::RemoteAnalysis;
use crate::models::app::App;
use crate::models::review::Review;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Period {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl Period {
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Period::Last7Days),
            30 => Some(Period::Last30Days),
            90 => Some(Period::Last90Days),
            _ => None,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            Period::Last7Days => 7,
            Period::Last30Days => 30,
            Period::Last90Days => 90,
        }
    }
}

/// Inline error messages, one slot per independently fetched section.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SectionErrors {
    pub apps: Option<String>,
    pub reviews: Option<String>,
    pub analysis: Option<String>,
    pub backlog: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ViewState {
    pub apps: Vec<App>,
    pub selected_app: Option<App>,
    pub reviews: Vec<Review>,
    pub analysis: Option<RemoteAnalysis>,
    pub backlog: Option<BacklogBoard>,
    pub sidebar_open: bool,
    pub period: Period,
    pub collecting: bool,
    pub errors: SectionErrors,
}

impl ViewState {
    pub fn selected_app_id(&self) -> Option<&str> {
        self.selected_app.as_ref().map(|a| a.app_id.as_str())
    }

    pub fn find_app(&self, app_id: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.app_id == app_id)
    }

    fn is_selected(&self, app_id: &str) -> bool {
        self.selected_app_id() == Some(app_id)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    AppsLoaded(Vec<App>),
    AppsFailed(String),
    AppSelected(App),
    ReviewsLoaded { app_id: String, reviews: Vec<Review> },
    ReviewsFailed { app_id: String, message: String },
    AnalysisLoaded { app_id: String, analysis: Option<RemoteAnalysis> },
    AnalysisFailed { app_id: String, message: String },
    BacklogLoaded(BacklogBoard),
    BacklogFailed(String),
    SidebarToggled,
    PeriodChanged(Period),
    CollectionStarted,
    CollectionFinished,
}

pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();

    match action {
        Action::AppsLoaded(apps) => {
            // keep the selection pointing at the refreshed record
            if let Some(id) = state.selected_app_id() {
                if let Some(fresh) = apps.iter().find(|a| a.app_id == id) {
                    next.selected_app = Some(fresh.clone());
                }
            }
            next.apps = apps;
            next.errors.apps = None;
        }
        Action::AppsFailed(message) => {
            next.errors.apps = Some(message);
        }
        Action::AppSelected(app) => {
            if !state.is_selected(&app.app_id) {
                next.reviews = Vec::new();
                next.analysis = None;
                next.backlog = None;
                next.errors.reviews = None;
                next.errors.analysis = None;
                next.errors.backlog = None;
            }
            next.selected_app = Some(app);
        }
        Action::ReviewsLoaded { app_id, reviews } => {
            if state.is_selected(&app_id) {
                next.reviews = reviews;
                next.errors.reviews = None;
            }
        }
        Action::ReviewsFailed { app_id, message } => {
            if state.is_selected(&app_id) {
                next.errors.reviews = Some(message);
            }
        }
        Action::AnalysisLoaded { app_id, analysis } => {
            if state.is_selected(&app_id) {
                next.analysis = analysis;
                next.errors.analysis = None;
            }
        }
        Action::AnalysisFailed { app_id, message } => {
            if state.is_selected(&app_id) {
                next.analysis = None;
                next.errors.analysis = Some(message);
            }
        }
        Action::BacklogLoaded(board) => {
            next.backlog = Some(board);
            next.errors.backlog = None;
        }
        Action::BacklogFailed(message) => {
            next.errors.backlog = Some(message);
        }
        Action::SidebarToggled => {
            next.sidebar_open = !state.sidebar_open;
        }
        Action::PeriodChanged(period) => {
            next.period = period;
        }
        Action::CollectionStarted => {
            next.collecting = true;
        }
        Action::CollectionFinished => {
            next.collecting = false;
        }
    }

    next
}
