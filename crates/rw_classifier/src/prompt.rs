use rw_core::RawArticle;
use serde_json::json;

/// System instruction handed to the model on every classification call.
pub const CLASSIFICATION_INSTRUCTIONS: &str = r#"You are a senior geopolitical risk analyst. Extract key information from raw news articles and return it as a JSON object with a single "articles" array conforming to the provided schema.

RULES:
1. Extract the publication `date` in ISO 8601 format (YYYY-MM-DDTHH:MM:SSZ).
2. List all relevant countries as ISO 3166 alpha-2 codes in the `countries` field, in order of relevance.
3. The `body` must be a concise 3-4 sentence summary of the event and its risk implications, written for a consultancy client.
4. If an article is not relevant to geopolitical or systemic risk (e.g. a local crime story), classify its `type` as 'irrelevant' and its `category` as 'n/a'.

TYPE CHOICES (select one): 'high priority', 'medium priority', 'forecast alert', 'strategic watch', 'irrelevant'

CATEGORY DEFINITIONS (select one; 'n/a' only for irrelevant articles):
1. Economic Warfare & Control: policy actions using economic means (sanctions, tariffs) for geopolitical pressure.
2. Geopolitical Instability: risks from political conflict, social unrest, wars, or government collapses.
3. Regulatory & Policy Shift: major governmental changes shaping markets and supply chains.
4. Structural & Environmental Risk: systemic threats to infrastructure, resources, or continuity.
5. Security & Technology Threat: high-impact risks where the primary vector is digital or emerging technology.

Return ONLY the JSON object, with no surrounding text."#;

/// Strict response schema for the classifier call. The draft array is wrapped
/// in an object because structured output requires an object at the root.
pub fn response_schema() -> serde_json::Value {
    let type_values = [
        "high priority",
        "medium priority",
        "forecast alert",
        "strategic watch",
        "irrelevant",
    ];
    let category_values = [
        "Economic Warfare & Control",
        "Geopolitical Instability",
        "Regulatory & Policy Shift",
        "Structural & Environmental Risk",
        "Security & Technology Threat",
        "n/a",
    ];

    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["articles"],
        "properties": {
            "articles": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["headline", "type", "countries", "category", "date", "body"],
                    "properties": {
                        "headline": { "type": "string" },
                        "type": { "type": "string", "enum": type_values },
                        "countries": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "category": { "type": "string", "enum": category_values },
                        "date": { "type": "string" },
                        "body": { "type": "string" }
                    }
                }
            }
        }
    })
}

/// The user message: the raw batch serialized as pretty JSON, matching how the
/// articles are shown to the analyst persona in the instructions.
pub fn user_prompt(articles: &[RawArticle]) -> serde_json::Result<String> {
    Ok(format!(
        "RAW NEWS ARTICLES:\n{}",
        serde_json::to_string_pretty(articles)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_requires_all_six_fields() {
        let schema = response_schema();
        let required = schema["properties"]["articles"]["items"]["required"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        for field in ["headline", "type", "countries", "category", "date", "body"] {
            assert!(names.contains(&field), "missing {}", field);
        }
    }

    #[test]
    fn test_schema_type_enum_includes_irrelevant() {
        let schema = response_schema();
        let values = schema["properties"]["articles"]["items"]["properties"]["type"]["enum"]
            .as_array()
            .unwrap();
        assert!(values.iter().any(|v| v == "irrelevant"));
    }

    #[test]
    fn test_user_prompt_embeds_titles() {
        let articles = vec![RawArticle {
            title: "Port strike spreads".to_string(),
            description: None,
            url: None,
            source: None,
            published_at: None,
            country: None,
        }];
        let prompt = user_prompt(&articles).unwrap();
        assert!(prompt.contains("Port strike spreads"));
    }
}
