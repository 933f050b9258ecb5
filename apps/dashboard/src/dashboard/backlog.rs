//! Backlog board: the BFF's generated items reshaped into the cards the backlog view shows.

use serde::{Deserialize, Serialize};

use crate::format::{format_effort, PriorityLevel};
use crate::models::backlog::BacklogReport;

const DEFAULT_EFFORT: &str = "3";
const DEFAULT_USER_IMPACT: &str = "Medium";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BacklogSummary {
    pub total_reviews_analyzed: u64,
    pub critical_issues_found: u64,
    pub improvement_suggestions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacklogCard {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub priority_level: PriorityLevel,
    pub estimated_effort: String,
    pub effort_label: String,
    pub user_impact: String,
    pub evidence: Vec<String>,
    pub acceptance_criteria: Vec<String>,
}

/// Also the payload sent back to the BFF when creating Jira issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BacklogBoard {
    pub app_id: String,
    pub summary: BacklogSummary,
    pub backlog_items: Vec<BacklogCard>,
}

impl BacklogBoard {
    pub fn from_report(app_id: &str, report: &BacklogReport) -> Self {
        let items = &report.generated_backlog_items;

        let critical_issues_found = items
            .iter()
            .filter(|i| PriorityLevel::parse(&i.priority) == PriorityLevel::High)
            .count() as u64;
        let improvement_suggestions = items
            .iter()
            .filter(|i| i.item_type.trim().eq_ignore_ascii_case("improvement"))
            .count() as u64;

        let backlog_items = items
            .iter()
            .map(|item| BacklogCard {
                title: item.description.clone(),
                description: item.description.clone(),
                category: item.item_type.clone(),
                priority: item.priority.clone(),
                priority_level: PriorityLevel::parse(&item.priority),
                estimated_effort: DEFAULT_EFFORT.to_string(),
                effort_label: format_effort(DEFAULT_EFFORT),
                user_impact: DEFAULT_USER_IMPACT.to_string(),
                evidence: vec![format!(
                    "Based on analysis of {} reviews",
                    report.total_reviews_processed
                )],
                acceptance_criteria: vec![format!("Implement: {}", item.description)],
            })
            .collect();

        BacklogBoard {
            app_id: app_id.to_string(),
            summary: BacklogSummary {
                total_reviews_analyzed: report.total_reviews_processed,
                critical_issues_found,
                improvement_suggestions,
            },
            backlog_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.backlog_items.is_empty()
    }
}
