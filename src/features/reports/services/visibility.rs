//! Which reports each role sees, and in what order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::Report;
use crate::features::users::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOrder {
    /// Most severe first, newest first within a severity
    SeverityThenNewest,
    Newest,
}

impl ViewOrder {
    fn compare(self, a: &Report, b: &Report) -> Ordering {
        match self {
            ViewOrder::SeverityThenNewest => b
                .severity
                .cmp(&a.severity)
                .then_with(|| b.created_at.cmp(&a.created_at)),
            ViewOrder::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

/// Admission rule and ordering for one role
pub struct ViewPolicy {
    admits: fn(&Report, &str) -> bool,
    pub order: ViewOrder,
}

impl ViewPolicy {
    pub fn admits(&self, report: &Report, viewer_email: &str) -> bool {
        (self.admits)(report, viewer_email)
    }
}

static MUNICIPALITY_VIEW: ViewPolicy = ViewPolicy {
    admits: |report, _| !report.is_medical_emergency(),
    order: ViewOrder::SeverityThenNewest,
};

static HOSPITAL_VIEW: ViewPolicy = ViewPolicy {
    admits: |report, _| report.is_medical_emergency(),
    order: ViewOrder::Newest,
};

static CITIZEN_VIEW: ViewPolicy = ViewPolicy {
    admits: |report, email| report.is_reported_by(email),
    order: ViewOrder::Newest,
};

pub fn policy_for(role: UserRole) -> &'static ViewPolicy {
    match role {
        UserRole::Municipality => &MUNICIPALITY_VIEW,
        UserRole::Hospital => &HOSPITAL_VIEW,
        UserRole::Citizen => &CITIZEN_VIEW,
    }
}

/// Reports visible to a viewer, ordered for that viewer's role
pub fn role_view<'a>(reports: &'a [Report], role: UserRole, viewer_email: &str) -> Vec<&'a Report> {
    let policy = policy_for(role);
    let mut view: Vec<&Report> = reports
        .iter()
        .filter(|report| policy.admits(report, viewer_email))
        .collect();
    view.sort_by(|a, b| policy.order.compare(a, b));
    view
}

/// Reports filed under `email`, newest first, regardless of role
pub fn own_reports<'a>(reports: &'a [Report], email: &str) -> Vec<&'a Report> {
    role_view(reports, UserRole::Citizen, email)
}

/// Narrowing applied on top of a role view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Show resolved reports instead of active ones
    pub resolved: bool,
    pub search: Option<String>,
}

impl ViewFilter {
    pub fn admits(&self, report: &Report) -> bool {
        report.is_resolved == self.resolved
            && self
                .search
                .as_deref()
                .map_or(true, |needle| report.matches_search(needle))
    }

    pub fn apply<'a>(&self, view: Vec<&'a Report>) -> Vec<&'a Report> {
        view.into_iter().filter(|report| self.admits(report)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ViewStats {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
}

impl ViewStats {
    pub fn of(view: &[&Report]) -> Self {
        let resolved = view.iter().filter(|report| report.is_resolved).count();
        Self {
            total: view.len(),
            active: view.len() - resolved,
            resolved,
        }
    }
}
