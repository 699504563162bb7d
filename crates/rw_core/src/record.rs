use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority classes assigned by the classifier. Drafts may additionally be
/// marked `irrelevant`; those never become records (see [`DraftType`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleType {
    #[serde(rename = "high priority")]
    HighPriority,
    #[serde(rename = "medium priority")]
    MediumPriority,
    #[serde(rename = "forecast alert")]
    ForecastAlert,
    #[serde(rename = "strategic watch")]
    StrategicWatch,
}

/// The five risk categories. Stored records are never `n/a`; that value only
/// exists on drafts (see [`DraftCategory`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Economic Warfare & Control")]
    EconomicWarfare,
    #[serde(rename = "Geopolitical Instability")]
    GeopoliticalInstability,
    #[serde(rename = "Regulatory & Policy Shift")]
    RegulatoryPolicyShift,
    #[serde(rename = "Structural & Environmental Risk")]
    StructuralEnvironmental,
    #[serde(rename = "Security & Technology Threat")]
    SecurityTechnology,
}

/// A classified, validated article. Headline is the archive primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub headline: String,
    #[serde(rename = "type")]
    pub article_type: ArticleType,
    /// ISO 3166 alpha-2 codes, classifier order preserved. May be empty.
    pub countries: Vec<String>,
    pub category: RiskCategory,
    pub date: DateTime<Utc>,
    pub body: String,
}

/// Draft `type`: the four record types plus the `irrelevant` marker used to
/// filter off-topic articles before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftType {
    #[serde(rename = "high priority")]
    HighPriority,
    #[serde(rename = "medium priority")]
    MediumPriority,
    #[serde(rename = "forecast alert")]
    ForecastAlert,
    #[serde(rename = "strategic watch")]
    StrategicWatch,
    #[serde(rename = "irrelevant")]
    Irrelevant,
}

impl DraftType {
    /// The stored record type, or `None` for irrelevant drafts.
    pub fn as_record_type(self) -> Option<ArticleType> {
        match self {
            Self::HighPriority => Some(ArticleType::HighPriority),
            Self::MediumPriority => Some(ArticleType::MediumPriority),
            Self::ForecastAlert => Some(ArticleType::ForecastAlert),
            Self::StrategicWatch => Some(ArticleType::StrategicWatch),
            Self::Irrelevant => None,
        }
    }
}

/// Draft `category`: the five record categories plus `n/a`, which the
/// classifier is instructed to use only for irrelevant drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftCategory {
    #[serde(rename = "Economic Warfare & Control")]
    EconomicWarfare,
    #[serde(rename = "Geopolitical Instability")]
    GeopoliticalInstability,
    #[serde(rename = "Regulatory & Policy Shift")]
    RegulatoryPolicyShift,
    #[serde(rename = "Structural & Environmental Risk")]
    StructuralEnvironmental,
    #[serde(rename = "Security & Technology Threat")]
    SecurityTechnology,
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl DraftCategory {
    /// The stored record category, or `None` for `n/a`.
    pub fn as_record_category(self) -> Option<RiskCategory> {
        match self {
            Self::EconomicWarfare => Some(RiskCategory::EconomicWarfare),
            Self::GeopoliticalInstability => Some(RiskCategory::GeopoliticalInstability),
            Self::RegulatoryPolicyShift => Some(RiskCategory::RegulatoryPolicyShift),
            Self::StructuralEnvironmental => Some(RiskCategory::StructuralEnvironmental),
            Self::SecurityTechnology => Some(RiskCategory::SecurityTechnology),
            Self::NotApplicable => None,
        }
    }
}

/// A single classifier output entry, before filtering and validation.
///
/// All six fields are required; a missing field fails the batch deserialize,
/// which the caller surfaces as malformed classifier output. The date stays a
/// string here so validation can report which record carried a bad one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedDraft {
    pub headline: String,
    #[serde(rename = "type")]
    pub draft_type: DraftType,
    pub countries: Vec<String>,
    pub category: DraftCategory,
    pub date: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_format() {
        let json = r#"{
            "headline": "Sanctions announced",
            "type": "high priority",
            "countries": ["US", "CN"],
            "category": "Economic Warfare & Control",
            "date": "2026-08-01T12:00:00Z",
            "body": "Summary."
        }"#;
        let record: ArticleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.article_type, ArticleType::HighPriority);
        assert_eq!(record.category, RiskCategory::EconomicWarfare);
        assert_eq!(record.countries, vec!["US", "CN"]);

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["type"], "high priority");
        assert_eq!(out["category"], "Economic Warfare & Control");
        assert_eq!(out["date"], "2026-08-01T12:00:00Z");
    }

    #[test]
    fn test_draft_irrelevant_tag() {
        let json = r#"{
            "headline": "Local bake sale",
            "type": "irrelevant",
            "countries": [],
            "category": "n/a",
            "date": "2026-08-01T12:00:00Z",
            "body": "Not a risk story."
        }"#;
        let draft: ClassifiedDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.draft_type, DraftType::Irrelevant);
        assert!(draft.draft_type.as_record_type().is_none());
        assert!(draft.category.as_record_category().is_none());
    }

    #[test]
    fn test_draft_missing_field_fails() {
        // No body: the whole entry must fail to parse rather than default.
        let json = r#"{
            "headline": "X",
            "type": "medium priority",
            "countries": [],
            "category": "Geopolitical Instability",
            "date": "2026-08-01T12:00:00Z"
        }"#;
        assert!(serde_json::from_str::<ClassifiedDraft>(json).is_err());
    }
}
