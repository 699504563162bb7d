use crate::{Error, Result};

/// Default news query, tuned for geopolitical and systemic risk coverage.
pub const DEFAULT_NEWS_COUNTRIES: &str = "ar,au,at,be,br,bg,ca,cn,co,cz,eg,fr,de,gr,hk,hu,in,id,ie,il,it,jp,lv,lt,my,mx,ma,nl,nz,ng,no,ph,pl,pt,ro,sa,rs,sg,sk,si,za,kr,se,ch,tw,th,tr,ae,ua,gb,us,ve";

pub const DEFAULT_NEWS_KEYWORDS: &str = "sanction,instability,trade war,tariff,natural disaster,supply chain disruption,conflict,trade restriction,geopolitical tension,election,protest,unrest,coup,sovereignty,border dispute,military exercise,economic policy,inflation,recession,central bank,interest rates,debt crisis,market volatility,export control,energy security,food security,critical minerals,port congestion,labor strike,cyberattack,disinformation,espionage,semiconductor";

/// Application configuration, read from the environment exactly once at
/// startup and passed by reference into component constructors. Components
/// never read env vars themselves.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Credentials
    pub news_api_key: String,
    pub classifier_api_key: String,
    pub github_token: String,

    // Remote repository
    pub archive_repo: String,
    pub archive_branch: String,
    pub archive_path: String,
    pub live_view_path: String,

    // Pipeline
    pub live_view_limit: usize,

    // Classifier
    pub model_name: String,

    // News query
    pub news_countries: String,
    pub news_keywords: String,
    pub news_limit: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            news_api_key: required("NEWS_API_KEY")?,
            classifier_api_key: required("OPENAI_API_KEY")?,
            github_token: required("GITHUB_TOKEN")?,
            archive_repo: required("ARCHIVE_REPO")?,
            archive_branch: optional("ARCHIVE_BRANCH", "main"),
            archive_path: optional("ARCHIVE_PATH", "data/archive.db"),
            live_view_path: optional("LIVE_VIEW_PATH", "data/live.json"),
            live_view_limit: optional("LIVE_VIEW_LIMIT", "150")
                .parse()
                .map_err(|e| Error::Config(format!("LIVE_VIEW_LIMIT is not a number: {}", e)))?,
            model_name: optional("MODEL_NAME", "gpt-4o-mini"),
            news_countries: optional("NEWS_COUNTRIES", DEFAULT_NEWS_COUNTRIES),
            news_keywords: optional("NEWS_KEYWORDS", DEFAULT_NEWS_KEYWORDS),
            news_limit: optional("NEWS_LIMIT", "25")
                .parse()
                .map_err(|e| Error::Config(format!("NEWS_LIMIT is not a number: {}", e)))?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {} is not set", name)))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_fatal() {
        // Env access in tests races with other test processes, so only assert
        // on a variable nothing else sets.
        std::env::remove_var("NEWS_API_KEY");
        let err = required("NEWS_API_KEY").unwrap_err();
        assert!(err.to_string().contains("NEWS_API_KEY"));
    }

    #[test]
    fn test_optional_falls_back_to_default() {
        std::env::remove_var("ARCHIVE_BRANCH");
        assert_eq!(optional("ARCHIVE_BRANCH", "main"), "main");
    }
}
