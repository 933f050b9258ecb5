//! Competitor comparison: a fixed set of rival investment apps, fetched one after another.

use serde::Serialize;
use tracing::{info, warn};

use crate::bff_client::BffSource;
use crate::format::{format_count, format_rating, format_score, RatingTier};

#[derive(Debug, Clone, Copy)]
pub struct CompetitorApp {
    pub app_id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub store: &'static str,
}

pub const COMPETITOR_APPS: &[CompetitorApp] = &[
    CompetitorApp {
        app_id: "br.com.xp.carteira",
        name: "XP Investimentos",
        category: "Finanças",
        store: "google_play",
    },
    CompetitorApp {
        app_id: "com.btg.pactual.digital.mobile",
        name: "BTG Pactual Investimentos",
        category: "Finanças",
        store: "google_play",
    },
    CompetitorApp {
        app_id: "br.com.bb.investimentosbb",
        name: "Investimentos BB Taxa Zero",
        category: "Finanças",
        store: "google_play",
    },
    CompetitorApp {
        app_id: "br.com.rico.mobile",
        name: "Rico: só vantagem pra investir",
        category: "Finanças",
        store: "google_play",
    },
];

/// A competitor merged with whatever the BFF returned for it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Competitor {
    pub app_id: String,
    pub name: String,
    pub category: String,
    pub store: String,
    pub rating: f64,
    pub total_reviews: u64,
    pub icon_url: Option<String>,
    pub fetch_error: Option<String>,
}

impl Competitor {
    fn basic(app: &CompetitorApp, error: String) -> Self {
        Competitor {
            app_id: app.app_id.to_string(),
            name: app.name.to_string(),
            category: app.category.to_string(),
            store: app.store.to_string(),
            rating: 0.0,
            total_reviews: 0,
            icon_url: None,
            fetch_error: Some(error),
        }
    }
}

/// Fetches each competitor in turn; a failed fetch degrades to a basic entry.
pub async fn fetch_competitors(bff: &dyn BffSource, apps: &[CompetitorApp]) -> Vec<Competitor> {
    let mut competitors = Vec::with_capacity(apps.len());

    for app in apps {
        match bff.get_app(app.app_id, app.store).await {
            Ok(data) => competitors.push(Competitor {
                app_id: app.app_id.to_string(),
                name: non_empty_or(data.name, app.name),
                category: non_empty_or(data.category, app.category),
                store: app.store.to_string(),
                rating: data.rating,
                total_reviews: data.total_reviews,
                icon_url: data.icon_url,
                fetch_error: None,
            }),
            Err(e) => {
                warn!(app_id = app.app_id, "Failed to fetch competitor: {e}");
                competitors.push(Competitor::basic(app, e.to_string()));
            }
        }
    }

    info!(count = competitors.len(), "Competitor data collected");
    competitors
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompetitorCard {
    pub rank: usize,
    pub app_id: String,
    pub name: String,
    pub category: String,
    pub rating: String,
    pub rating_tier: RatingTier,
    pub total_reviews: String,
    pub icon_url: Option<String>,
    pub leading: bool,
    pub fetch_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompetitorInsights {
    pub competitor_count: usize,
    pub average_rating: String,
    pub total_reviews: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompetitorBoard {
    /// Ordered by rating, best first.
    pub ranking: Vec<CompetitorCard>,
    pub insights: CompetitorInsights,
}

impl CompetitorBoard {
    pub fn build(competitors: &[Competitor]) -> Self {
        let mut ordered: Vec<&Competitor> = competitors.iter().collect();
        // stable: equal ratings keep their list order
        ordered.sort_by(|a, b| b.rating.total_cmp(&a.rating));

        let ranking = ordered
            .iter()
            .enumerate()
            .map(|(index, c)| CompetitorCard {
                rank: index + 1,
                app_id: c.app_id.clone(),
                name: c.name.clone(),
                category: c.category.clone(),
                rating: format_rating(c.rating),
                rating_tier: RatingTier::from_rating(c.rating),
                total_reviews: format_count(c.total_reviews),
                icon_url: c.icon_url.clone(),
                leading: index < 2,
                fetch_error: c.fetch_error.clone(),
            })
            .collect();

        let average_rating = if competitors.is_empty() {
            None
        } else {
            Some(competitors.iter().map(|c| c.rating).sum::<f64>() / competitors.len() as f64)
        };

        CompetitorBoard {
            ranking,
            insights: CompetitorInsights {
                competitor_count: competitors.len(),
                average_rating: format_score(average_rating),
                total_reviews: format_count(competitors.iter().map(|c| c.total_reviews).sum()),
            },
        }
    }
}
