//! Inquiry triage: priority annotation and inbox ordering

use std::cmp::Ordering;
use std::fmt;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

use crate::ai::{AiFlows, PrioritizeRequest};
use crate::support::{CustomerDirectory, Inquiry, Priority, prioritization_text};

/// Display bucket for a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityLabel {
    Urgent,
    High,
    Medium,
    Low,
    Unscored,
}

impl PriorityLabel {
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => Self::Unscored,
            Some(s) if s >= 9.0 => Self::Urgent,
            Some(s) if s >= 7.0 => Self::High,
            Some(s) if s >= 4.0 => Self::Medium,
            Some(_) => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unscored => "N/A",
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of inquiries with equal priority score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    OldestFirst,
    NewestFirst,
}

/// Missing scores sort as 0
pub fn sort_key(inquiry: &Inquiry) -> f64 {
    inquiry.priority_score().unwrap_or(0.0)
}

fn compare(a: &Inquiry, b: &Inquiry, tie_break: TieBreak) -> Ordering {
    let by_score = sort_key(b).total_cmp(&sort_key(a));
    by_score.then_with(|| match tie_break {
        TieBreak::OldestFirst => a.timestamp.cmp(&b.timestamp),
        TieBreak::NewestFirst => b.timestamp.cmp(&a.timestamp),
    })
}

/// Score descending, then timestamp. `sort_by` is stable, so inquiries equal
/// on both keep their relative order.
pub fn rank(inquiries: &mut [Inquiry], tie_break: TieBreak) {
    inquiries.sort_by(|a, b| compare(a, b, tie_break));
}

fn request_for(inquiry: &Inquiry, customers: &CustomerDirectory) -> PrioritizeRequest {
    let name = customers.display_name(inquiry);
    PrioritizeRequest {
        inquiry_text: prioritization_text(inquiry, name.as_deref()),
    }
}

/// Annotate every inquiry that has no priority yet. All calls run
/// concurrently; each result lands on the inquiry it was issued for,
/// whatever order they finish in. Returns how many were annotated.
pub async fn annotate_pending(
    inquiries: &mut [Inquiry],
    customers: &CustomerDirectory,
    flows: &AiFlows,
) -> usize {
    let mut jobs = FuturesUnordered::new();

    for inquiry in inquiries.iter_mut().filter(|i| i.priority.is_none()) {
        inquiry.loading_priority = true;
        let id = inquiry.id.clone();
        let request = request_for(inquiry, customers);
        let flows = flows.clone();
        jobs.push(async move {
            let priority = flows.prioritize(&request).await;
            (id, priority)
        });
    }

    let mut applied = 0;
    while let Some((id, priority)) = jobs.next().await {
        if apply_priority(inquiries, &id, priority) {
            applied += 1;
        }
    }

    tracing::info!("Triage: annotated {} inquiries", applied);
    applied
}

/// Re-run annotation for one inquiry, replacing any cached priority
pub async fn reprioritize(
    inquiries: &mut [Inquiry],
    id: &str,
    customers: &CustomerDirectory,
    flows: &AiFlows,
) -> Option<Priority> {
    let inquiry = inquiries.iter_mut().find(|i| i.id == id)?;
    inquiry.loading_priority = true;
    let request = request_for(inquiry, customers);

    let priority = flows.prioritize(&request).await;
    apply_priority(inquiries, id, priority.clone());
    Some(priority)
}

fn apply_priority(inquiries: &mut [Inquiry], id: &str, priority: Priority) -> bool {
    match inquiries.iter_mut().find(|i| i.id == id) {
        Some(inquiry) => {
            inquiry.priority = Some(priority);
            inquiry.loading_priority = false;
            true
        }
        None => {
            tracing::warn!("Triage: inquiry {} disappeared before its priority arrived", id);
            false
        }
    }
}
