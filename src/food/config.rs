use std::env;
use std::time::Duration;

pub const DEFAULT_EXACT_MATCH_URL: &str = "https://api.api-ninjas.com/v1/nutrition";
pub const DEFAULT_COMMUNITY_DB_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct FoodConfig {
    /// Exact-match API credential. `None` disables that provider.
    pub api_key: Option<String>,
    pub exact_match_url: String,
    pub community_db_url: String,
    pub page_size: u32,
    pub user_agent: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for FoodConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoodConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("exact_match_url", &self.exact_match_url)
            .field("community_db_url", &self.community_db_url)
            .field("page_size", &self.page_size)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            exact_match_url: DEFAULT_EXACT_MATCH_URL.to_string(),
            community_db_url: DEFAULT_COMMUNITY_DB_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FoodConfig {
    /// Reads provider settings from the environment. A missing credential is not an error.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = ["NUTRITION_API_KEY", "API_NINJAS_KEY"]
            .iter()
            .filter_map(|key| lookup(key))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        let page_size = lookup("COMMUNITY_DB_PAGE_SIZE")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.page_size);

        let timeout = lookup("NUTRITION_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_key,
            exact_match_url: lookup("EXACT_MATCH_URL").unwrap_or(defaults.exact_match_url),
            community_db_url: lookup("COMMUNITY_DB_URL").unwrap_or(defaults.community_db_url),
            page_size,
            user_agent: lookup("NUTRITION_USER_AGENT").unwrap_or(defaults.user_agent),
            timeout,
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
