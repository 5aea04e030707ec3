use reqwest::Url;
use std::env;

/// Query-string parameter carrying the quiz identifier.
pub const QUIZ_ID_PARAM: &str = "quizUrl";

/// Read a setting from the environment, loading `.env` first.
/// Empty values count as unset.
pub fn env_setting(name: &str) -> Option<String> {
    // Silently ignore a missing .env file
    let _ = dotenvy::dotenv();
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Trait for sources that need a secret from the environment
pub trait KeyFromEnv {
    /// The environment variable holding the key
    const KEY_NAME: &'static str;

    /// Find the key in the environment or the .env file
    fn find_key() -> Option<String> {
        env_setting(Self::KEY_NAME)
    }
}

/// Pull the quiz identifier out of a page location.
///
/// Accepts a full URL (`https://host/quiz/?quizUrl=abc`), a bare query string
/// with or without the leading `?`, or nothing useful at all.
pub fn quiz_id_from_location(location: &str) -> Option<String> {
    quiz_param(location, QUIZ_ID_PARAM)
}

pub fn quiz_param(location: &str, param: &str) -> Option<String> {
    let location = location.trim();
    let url = match Url::parse(location) {
        Ok(url) => url,
        Err(_) => {
            let query = location.trim_start_matches('?');
            Url::parse(&format!("http://localhost/?{}", query)).ok()?
        }
    };
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Split a comma separated setting, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
