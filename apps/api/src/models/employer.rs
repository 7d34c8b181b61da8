use std::fmt;

use serde::{Deserialize, Serialize};

/// The four outreach-motivation categories a match is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutreachSegment {
    TalentPipeline,
    CostReduction,
    SafetyCompliance,
    CommunityInvestment,
}

impl OutreachSegment {
    pub const ALL: [OutreachSegment; 4] = [
        OutreachSegment::TalentPipeline,
        OutreachSegment::CostReduction,
        OutreachSegment::SafetyCompliance,
        OutreachSegment::CommunityInvestment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OutreachSegment::TalentPipeline => "Talent Pipeline & Retention",
            OutreachSegment::CostReduction => "Cost/Time-to-Productivity Reduction",
            OutreachSegment::SafetyCompliance => "Safety & Compliance Readiness",
            OutreachSegment::CommunityInvestment => "Community Investment & Workforce Funding",
        }
    }
}

impl fmt::Display for OutreachSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for OutreachSegment {
    type Error = String;

    /// Accepts the full label case-insensitively, or any label whose first
    /// word matches (models sometimes shorten "Talent Pipeline & Retention").
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let needle = value.trim().to_lowercase();
        OutreachSegment::ALL
            .into_iter()
            .find(|s| s.label().to_lowercase() == needle)
            .or_else(|| {
                let first = needle.split_whitespace().next()?;
                OutreachSegment::ALL
                    .into_iter()
                    .find(|s| s.label().to_lowercase().starts_with(first))
            })
            .ok_or_else(|| format!("unknown outreach segment '{value}'"))
    }
}

impl From<OutreachSegment> for String {
    fn from(segment: OutreachSegment) -> Self {
        segment.label().to_string()
    }
}

/// A scored employer candidate. `name` is the identity key for selection
/// and the outreach cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerMatch {
    pub name: String,
    pub score: f64,
    pub rationale: String,
    pub segment: OutreachSegment,
    pub industry_alignment: f64,
    pub job_title_overlap: f64,
    pub skill_overlap: f64,
    pub geographic_proximity: f64,
    pub hiring_signals: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachAssets {
    pub primary_email: String,
    pub follow_ups: Vec<String>,
    pub call_script: Vec<String>,
    pub subject_lines: Vec<String>,
    pub linked_in_message: String,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parses_exact_label() {
        let s: OutreachSegment =
            serde_json::from_str(r#""Safety & Compliance Readiness""#).unwrap();
        assert_eq!(s, OutreachSegment::SafetyCompliance);
    }

    #[test]
    fn test_segment_parses_case_insensitive_and_shortened() {
        let s = OutreachSegment::try_from("cost/time-to-PRODUCTIVITY reduction".to_string());
        assert_eq!(s, Ok(OutreachSegment::CostReduction));
        let s = OutreachSegment::try_from("Community Investment".to_string());
        assert_eq!(s, Ok(OutreachSegment::CommunityInvestment));
    }

    #[test]
    fn test_segment_rejects_unknown() {
        assert!(OutreachSegment::try_from("Vibes".to_string()).is_err());
    }

    #[test]
    fn test_segment_serializes_as_label() {
        let json = serde_json::to_string(&OutreachSegment::TalentPipeline).unwrap();
        assert_eq!(json, r#""Talent Pipeline & Retention""#);
    }

    #[test]
    fn test_employer_match_deserializes_without_contact() {
        let json = r#"{
            "name": "Acme Fab",
            "score": 88,
            "rationale": "Large welding shop",
            "segment": "Talent Pipeline & Retention",
            "industryAlignment": 90,
            "jobTitleOverlap": 85,
            "skillOverlap": 80,
            "geographicProximity": 95,
            "hiringSignals": 70
        }"#;
        let m: EmployerMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.name, "Acme Fab");
        assert!(m.website.is_none());
    }
}
