use std::fmt;

use serde::{Deserialize, Serialize};

/// The six content themes rotated across a post batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentPillar {
    EmployerRoi,
    TalentPipeline,
    ProgramSpotlight,
    IndustryInsight,
    CommunityImpact,
    DiversityInclusion,
}

impl ContentPillar {
    pub const ALL: [ContentPillar; 6] = [
        ContentPillar::EmployerRoi,
        ContentPillar::TalentPipeline,
        ContentPillar::ProgramSpotlight,
        ContentPillar::IndustryInsight,
        ContentPillar::CommunityImpact,
        ContentPillar::DiversityInclusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentPillar::EmployerRoi => "Employer ROI/Value",
            ContentPillar::TalentPipeline => "Talent Pipeline",
            ContentPillar::ProgramSpotlight => "Program Spotlight",
            ContentPillar::IndustryInsight => "Industry Insight",
            ContentPillar::CommunityImpact => "Community Impact",
            ContentPillar::DiversityInclusion => "Diversity & Inclusion",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            ContentPillar::EmployerRoi => "cost savings, retention",
            ContentPillar::TalentPipeline => "developing local skills",
            ContentPillar::ProgramSpotlight => "ease of participation, credentials",
            ContentPillar::IndustryInsight => "future-proofing the workforce",
            ContentPillar::CommunityImpact => "local economic growth",
            ContentPillar::DiversityInclusion => "broadening the talent pool",
        }
    }
}

impl fmt::Display for ContentPillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for ContentPillar {
    type Error = String;

    /// Full label case-insensitively, or a label sharing the first word
    /// ("Employer ROI" for "Employer ROI/Value").
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let needle = value.trim().to_lowercase();
        ContentPillar::ALL
            .into_iter()
            .find(|p| p.label().to_lowercase() == needle)
            .or_else(|| {
                let first = needle.split_whitespace().next()?;
                ContentPillar::ALL
                    .into_iter()
                    .find(|p| p.label().to_lowercase().split_whitespace().next() == Some(first))
            })
            .ok_or_else(|| format!("unknown content pillar '{value}'"))
    }
}

impl From<ContentPillar> for String {
    fn from(pillar: ContentPillar) -> Self {
        pillar.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInPost {
    pub day: u32,
    pub pillar: ContentPillar,
    pub content: String,
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Local edit to a single post. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub content: Option<String>,
    pub hashtags: Option<Vec<String>>,
}
