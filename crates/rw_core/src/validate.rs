use chrono::{DateTime, Utc};
use tracing::debug;

use crate::record::{ArticleRecord, ClassifiedDraft};
use crate::{Error, Result};

/// Filter and validate a classified batch.
///
/// Drafts marked `irrelevant` are dropped. Every remaining draft must be fully
/// formed: a real category (not `n/a`), a parseable UTC date, a non-empty
/// headline and body. A bad draft fails the whole batch rather than being
/// silently skipped. Order is preserved.
pub fn validate_batch(drafts: Vec<ClassifiedDraft>) -> Result<Vec<ArticleRecord>> {
    let total = drafts.len();
    let mut records = Vec::with_capacity(total);

    for draft in drafts {
        let Some(article_type) = draft.draft_type.as_record_type() else {
            debug!("Dropping irrelevant draft: {}", draft.headline);
            continue;
        };

        if draft.headline.trim().is_empty() {
            return Err(Error::Validation("draft has an empty headline".to_string()));
        }
        if draft.body.trim().is_empty() {
            return Err(Error::Validation(format!(
                "draft '{}' has an empty body",
                draft.headline
            )));
        }

        let category = draft.category.as_record_category().ok_or_else(|| {
            Error::Validation(format!(
                "relevant draft '{}' has category n/a",
                draft.headline
            ))
        })?;

        let date = parse_utc_date(&draft.date).map_err(|e| {
            Error::Validation(format!(
                "draft '{}' has an invalid date '{}': {}",
                draft.headline, draft.date, e
            ))
        })?;

        records.push(ArticleRecord {
            headline: draft.headline,
            article_type,
            countries: draft.countries,
            category,
            date,
            body: draft.body,
        });
    }

    debug!("Validated {}/{} drafts as relevant records", records.len(), total);
    Ok(records)
}

fn parse_utc_date(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DraftCategory, DraftType};

    fn draft(headline: &str, draft_type: DraftType, category: DraftCategory) -> ClassifiedDraft {
        ClassifiedDraft {
            headline: headline.to_string(),
            draft_type,
            countries: vec!["US".to_string()],
            category,
            date: "2026-08-01T12:00:00Z".to_string(),
            body: "A summary of the event.".to_string(),
        }
    }

    #[test]
    fn test_irrelevant_drafts_are_dropped() {
        let drafts = vec![
            draft("Keep", DraftType::HighPriority, DraftCategory::GeopoliticalInstability),
            draft("Drop", DraftType::Irrelevant, DraftCategory::NotApplicable),
            draft("Keep too", DraftType::StrategicWatch, DraftCategory::SecurityTechnology),
        ];
        let records = validate_batch(drafts).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].headline, "Keep");
        assert_eq!(records[1].headline, "Keep too");
    }

    #[test]
    fn test_relevant_draft_with_na_category_is_rejected() {
        let drafts = vec![draft("Bad", DraftType::MediumPriority, DraftCategory::NotApplicable)];
        assert!(validate_batch(drafts).is_err());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let mut d = draft("Bad date", DraftType::ForecastAlert, DraftCategory::StructuralEnvironmental);
        d.date = "yesterday".to_string();
        assert!(validate_batch(vec![d]).is_err());
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let mut d = draft("Empty", DraftType::HighPriority, DraftCategory::EconomicWarfare);
        d.body = "  ".to_string();
        assert!(validate_batch(vec![d]).is_err());
    }

    #[test]
    fn test_offset_dates_are_normalized_to_utc() {
        let mut d = draft("Offset", DraftType::HighPriority, DraftCategory::EconomicWarfare);
        d.date = "2026-08-01T14:00:00+02:00".to_string();
        let records = validate_batch(vec![d]).unwrap();
        assert_eq!(records[0].date.to_rfc3339(), "2026-08-01T12:00:00+00:00");
    }
}
