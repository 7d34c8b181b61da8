//! Plain-text bundles for "copy all" and the hashtag suggestion bank.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::employer::EmployerMatch;
use crate::models::profile::ProgramProfile;
use crate::workflow::outreach::OutreachCache;
use crate::workflow::posts::PostBatch;
use crate::workflow::selection::SelectionSet;

const BASE_HASHTAGS: [&str; 7] = [
    "Apprenticeship",
    "WorkforceDevelopment",
    "LocalHiring",
    "FutureOfWork",
    "SkillsGap",
    "CommunityImpact",
    "TalentPipeline",
];

/// Shown before a profile exists.
const STARTER_HASHTAGS: usize = 4;

const POST_SEPARATOR: &str = "\n\n---\n\n";

/// Aggregates cached outreach for every selected employer, in match order.
pub fn outreach_summary(
    title: Option<&str>,
    matches: &[EmployerMatch],
    selection: &SelectionSet,
    cache: &OutreachCache,
    date: NaiveDate,
) -> Result<String, AppError> {
    let none_ready = || {
        AppError::Precondition("No outreach assets have been built for selected employers yet".to_string())
    };
    if selection.is_empty() || cache.is_empty() {
        return Err(none_ready());
    }

    let ready: Vec<_> = selection
        .filter(matches)
        .filter_map(|m| cache.get(&m.name).map(|assets| (m, assets)))
        .collect();
    if ready.is_empty() {
        return Err(none_ready());
    }

    let mut out = String::from("--- AEGE OUTREACH CAMPAIGN SUMMARY ---\n");
    let _ = writeln!(out, "Apprenticeship: {}", title.unwrap_or("Unknown"));
    let _ = writeln!(out, "Date: {}\n", date.format("%-m/%-d/%Y"));

    for (i, (m, assets)) in ready.iter().enumerate() {
        let _ = writeln!(out, "[{}] TARGET EMPLOYER: {}", i + 1, m.name);
        let _ = writeln!(out, "Segment: {}\n", m.segment);
        let _ = writeln!(out, "PRIMARY EMAIL:\n{}\n", assets.primary_email);
        let _ = writeln!(out, "LINKEDIN DM:\n{}\n", assets.linked_in_message);
        out.push_str("CALL SCRIPT POINTS:\n");
        for point in &assets.call_script {
            let _ = writeln!(out, "- {point}");
        }
        out.push_str("\n--------------------------------------------\n\n");
    }
    Ok(out)
}

pub fn linkedin_batch_text(batch: &PostBatch) -> Result<String, AppError> {
    if batch.is_empty() {
        return Err(AppError::Precondition("Generate a LinkedIn batch first".to_string()));
    }
    Ok(batch
        .posts()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let tags: Vec<String> = p.hashtags.iter().map(|h| format!("#{h}")).collect();
            format!("[POST {} - {}]\n{}\n{}", i + 1, p.pillar, p.content, tags.join(" "))
        })
        .collect::<Vec<_>>()
        .join(POST_SEPARATOR))
}

pub fn suggested_hashtags(profile: Option<&ProgramProfile>) -> Vec<String> {
    let Some(profile) = profile else {
        return BASE_HASHTAGS[..STARTER_HASHTAGS].iter().map(|s| s.to_string()).collect();
    };

    let mut bank: Vec<String> = BASE_HASHTAGS.iter().map(|s| s.to_string()).collect();
    for industry in &profile.industries {
        let tag: String = industry.split_whitespace().collect();
        if !tag.is_empty() && !bank.contains(&tag) {
            bank.push(tag);
        }
    }
    bank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employer::fixtures::{assets, employer};
    use crate::models::linkedin::fixtures::batch;
    use crate::models::profile::fixtures::welding_profile;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn test_summary_only_includes_selected_with_assets() {
        let matches = vec![employer("Acme"), employer("Globex"), employer("Initech")];
        let mut selection = SelectionSet::all_of(&matches);
        selection.toggle("Globex");
        let mut cache = OutreachCache::default();
        cache.store("Globex", assets("g"));
        cache.store("Initech", assets("i"));

        let text = outreach_summary(Some("Welding"), &matches, &selection, &cache, date()).unwrap();

        assert!(text.starts_with("--- AEGE OUTREACH CAMPAIGN SUMMARY ---\nApprenticeship: Welding\nDate: 3/7/2025\n"));
        assert!(text.contains("[1] TARGET EMPLOYER: Initech"));
        assert!(!text.contains("Globex"));
        assert!(!text.contains("Acme"));
        assert!(text.contains("- i intro\n- i ask\n"));
    }

    #[test]
    fn test_summary_without_assets_is_rejected() {
        let matches = vec![employer("Acme")];
        let selection = SelectionSet::all_of(&matches);
        let result = outreach_summary(None, &matches, &selection, &OutreachCache::default(), date());
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[test]
    fn test_linkedin_text_layout() {
        let posts = batch(2);
        let mut posts_batch = PostBatch::default();
        posts_batch.replace(posts.clone());
        let text = linkedin_batch_text(&posts_batch).unwrap();
        let parts: Vec<&str> = text.split(POST_SEPARATOR).collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            format!("[POST 2 - {}]\n{}\n#Apprenticeship #Welding", posts[1].pillar, posts[1].content)
        );
    }

    #[test]
    fn test_linkedin_text_requires_posts() {
        assert!(matches!(
            linkedin_batch_text(&PostBatch::default()),
            Err(AppError::Precondition(_))
        ));
    }

    #[test]
    fn test_summary_with_nothing_selected_is_rejected() {
        let matches = vec![employer("Acme")];
        let mut cache = OutreachCache::default();
        cache.store("Acme", assets("a"));
        let result = outreach_summary(None, &matches, &SelectionSet::default(), &cache, date());
        assert!(matches!(result, Err(AppError::Precondition(_))));
    }

    #[test]
    fn test_hashtags_without_profile() {
        assert_eq!(
            suggested_hashtags(None),
            vec!["Apprenticeship", "WorkforceDevelopment", "LocalHiring", "FutureOfWork"]
        );
    }

    #[test]
    fn test_hashtags_add_industries_once() {
        let mut profile = welding_profile();
        profile.industries.push("Advanced  Manufacturing".to_string());
        profile.industries.push("Talent Pipeline".to_string());
        let bank = suggested_hashtags(Some(&profile));
        assert_eq!(bank.len(), 9);
        assert_eq!(&bank[7..], ["AdvancedManufacturing", "Energy"]);
    }
}
