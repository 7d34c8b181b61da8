use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub hard: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// AI-enhanced program description. Created once per engine run from the
/// submitted intake form and never mutated afterwards; a reset replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramProfile {
    pub title: String,
    pub region: String,
    pub industries: Vec<String>,
    pub elevator_pitch: String,
    pub geo_analytics: String,
    #[serde(default)]
    pub wage_range: Option<String>,
    #[serde(default)]
    pub primary_contact_info: ContactInfo,
    #[serde(default)]
    pub site_summary: Option<String>,
    pub safety_assessment: String,
    pub skills: Skills,
    #[serde(default)]
    pub credentials: Vec<String>,
    pub target_job_titles: Vec<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub cta_link: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Fallback call-to-action used when the program has no link of its own.
pub const DEFAULT_CTA: &str = "Visit our official website";

impl ProgramProfile {
    pub fn cta(&self) -> &str {
        self.cta_link
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_CTA)
    }
}

/// Input to the enhancement step, assembled from a validated intake form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub title: String,
    pub region: String,
    pub industries: Vec<String>,
    pub wage_range: Option<String>,
    pub start_date: String,
    pub cta_link: Option<String>,
    pub primary_contact_info: ContactInfo,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn welding_profile() -> ProgramProfile {
        ProgramProfile {
            title: "Welding Technician".to_string(),
            region: "Fresno".to_string(),
            industries: vec!["Advanced Manufacturing".to_string(), "Energy".to_string()],
            elevator_pitch: "Earn while you learn.".to_string(),
            geo_analytics: "Growing fabrication sector.".to_string(),
            wage_range: Some("$20-$28/hr".to_string()),
            primary_contact_info: ContactInfo::default(),
            site_summary: None,
            safety_assessment: "OSHA-10 required".to_string(),
            skills: Skills {
                hard: vec!["MIG".to_string()],
                soft: vec!["Teamwork".to_string()],
            },
            credentials: vec![],
            target_job_titles: vec!["Welder".to_string()],
            start_date: "TBD".to_string(),
            cta_link: Some("https://college.edu/weld".to_string()),
            suggestions: vec![],
        }
    }
}
