// database/applicants/filter.rs - admin listing filters

use super::model::ApplicantModel;
use serde::Deserialize;

// Sentinel the admin dashboard sends for "no filter"
const ALL: &str = "All";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantFilter {
    pub search: Option<String>,
    pub role: Option<String>,
    pub subject: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

impl ApplicantFilter {
    /// Search matches name case-insensitively, phone and NID as substrings.
    pub fn matches(&self, applicant: &ApplicantModel) -> bool {
        if let Some(search) = active(&self.search) {
            let needle = search.to_lowercase();
            let hit = applicant.name.to_lowercase().contains(&needle)
                || applicant.phone.contains(&needle)
                || applicant.nid.contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(role) = active(&self.role) {
            if applicant.apply_for != role {
                return false;
            }
        }

        if let Some(subject) = active(&self.subject) {
            if applicant.selected_subject.as_deref() != Some(subject) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, applicants: Vec<ApplicantModel>) -> Vec<ApplicantModel> {
        applicants.into_iter().filter(|a| self.matches(a)).collect()
    }
}
