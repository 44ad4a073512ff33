use std::time::Duration;

use regex::Regex;
use url::Url;

use crate::domain::TwitterApi;
use crate::errors::{SourceError, SourceResult};
use crate::transport::OAuth1Keys;

pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_WIKIPEDIA_API_BASE: &str = "https://en.wikipedia.org";
pub const DEFAULT_FACEBOOK_API_BASE: &str = "https://graph.facebook.com";

const DEFAULT_TWITTER_COUNT: u32 = 200;
const DEFAULT_WIKIPEDIA_COUNT: u32 = 50;
const DEFAULT_FETCH_COUNT: u32 = 10;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    None,
    Bearer(String),
    AccessToken(String),
    OAuth1(OAuth1Keys),
}

impl Credentials {
    pub fn bearer(&self) -> Option<String> {
        match self {
            Credentials::Bearer(token) => Some(token.clone()),
            _ => None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Credentials::AccessToken(token) => Some(token),
            _ => None,
        }
    }

    pub fn oauth1(&self) -> Option<&OAuth1Keys> {
        match self {
            Credentials::OAuth1(keys) => Some(keys),
            _ => None,
        }
    }
}

/// Read-only settings for one upstream source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    /// Handle, user name or page id the source is queried for
    pub identifier: String,
    pub credentials: Credentials,
    /// Default number of items requested per page render
    pub count: u32,
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            identifier: identifier.into(),
            credentials: Credentials::None,
            count: DEFAULT_FETCH_COUNT,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Join path segments onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitterConfig {
    pub api: TwitterApi,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacebookConfig {
    /// `identifier` is the page id
    pub fetch: FetchConfig,
    pub album_id: Option<String>,
}

impl FacebookConfig {
    /// Photos edge of the configured album, without credentials
    pub fn album_photos_url(&self) -> Option<String> {
        self.album_id
            .as_ref()
            .map(|album| self.fetch.endpoint(&format!("{}/photos", album)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documents {
    pub lab_rules: Option<String>,
    pub publication_policy: Option<String>,
    pub data_sharing_policy: Option<String>,
}

/// Account names shown on every page; empty when not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialAccounts {
    pub lab_name: String,
    pub twitter: String,
    pub facebook: String,
    pub google_plus: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub twitter: Option<TwitterConfig>,
    pub wikipedia: Option<FetchConfig>,
    pub facebook: Option<FacebookConfig>,
    pub documents: Documents,
    pub social: SocialAccounts,
    pub google_calendar_id: Option<String>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            twitter: None,
            wikipedia: None,
            facebook: None,
            documents: Documents::default(),
            social: SocialAccounts::default(),
            google_calendar_id: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> SourceResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                report_dotenv_error(dotenvy::from_path(&env_path))?;
            }
        }
        // Fall back to current directory
        report_dotenv_error(dotenvy::dotenv())?;

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from a dotenv-style file without touching the process environment
    pub fn from_env_file(path: &std::path::Path) -> SourceResult<Self> {
        let vars: Vec<(String, String)> = dotenvy::from_path_iter(path)
            .map_err(|e| SourceError::Config(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        Self::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> SourceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let twitter = match get("TWITTER_NAME") {
            Some(name) => Some(Self::twitter_config(&name, &get)?),
            None => None,
        };

        let wikipedia = match get("WIKIPEDIA_USERNAME") {
            Some(username) => Some(
                FetchConfig::new(
                    base_url(&get, "WIKIPEDIA_API_BASE", DEFAULT_WIKIPEDIA_API_BASE)?,
                    username,
                )
                .with_count(parse_count(&get, "WIKIPEDIA_COUNT", DEFAULT_WIKIPEDIA_COUNT)?),
            ),
            None => None,
        };

        let facebook = match get("FACEBOOK_ID") {
            Some(page_id) => Some(Self::facebook_config(&page_id, &get)?),
            None => None,
        };

        let documents = Documents {
            lab_rules: document_url(&get, "LAB_RULES_URL")?,
            publication_policy: document_url(&get, "PUBLICATION_POLICY_URL")?,
            data_sharing_policy: document_url(&get, "DATA_SHARING_POLICY_URL")?,
        };

        let social = SocialAccounts {
            lab_name: get("LAB_NAME").unwrap_or_default(),
            twitter: get("TWITTER_NAME").unwrap_or_default(),
            facebook: get("FACEBOOK_NAME").unwrap_or_default(),
            google_plus: get("GOOGLE_PLUS_ID").unwrap_or_default(),
        };

        let timeout_secs = match get("LABFEEDS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                SourceError::Config(format!(
                    "LABFEEDS_HTTP_TIMEOUT_SECS must be a positive number of seconds, got {:?}",
                    raw
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            twitter,
            wikipedia,
            facebook,
            documents,
            social,
            google_calendar_id: get("GOOGLE_CALENDAR_ID"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn twitter_config<G>(name: &str, get: &G) -> SourceResult<TwitterConfig>
    where
        G: Fn(&str) -> Option<String>,
    {
        let handle_regex = Regex::new(r"^@?([A-Za-z0-9_]{1,15})$")
            .map_err(|e| SourceError::Config(e.to_string()))?;
        let handle = handle_regex
            .captures(name)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| SourceError::Config(format!("Invalid Twitter handle: {}", name)))?;

        let api = match get("TWITTER_API_VERSION") {
            Some(raw) => raw.parse::<TwitterApi>().map_err(SourceError::Config)?,
            None => TwitterApi::default(),
        };

        let credentials = match api {
            TwitterApi::V2 => match get("TWITTER_BEARER_TOKEN") {
                Some(token) => Credentials::Bearer(token),
                None => {
                    return Err(SourceError::Config(
                        "TWITTER_BEARER_TOKEN is required for Twitter API v2".to_string(),
                    ))
                }
            },
            TwitterApi::V1 => Self::twitter_oauth1_keys(get)?
                .map(Credentials::OAuth1)
                .unwrap_or(Credentials::None),
        };

        let fetch = FetchConfig::new(
            base_url(get, "TWITTER_API_BASE", DEFAULT_TWITTER_API_BASE)?,
            handle,
        )
        .with_credentials(credentials)
        .with_count(parse_count(get, "TWITTER_COUNT", DEFAULT_TWITTER_COUNT)?);

        Ok(TwitterConfig { api, fetch })
    }

    /// All four OAuth keys, or none of them
    fn twitter_oauth1_keys<G>(get: &G) -> SourceResult<Option<OAuth1Keys>>
    where
        G: Fn(&str) -> Option<String>,
    {
        const KEYS: [&str; 4] = [
            "TWITTER_CONSUMER_KEY",
            "TWITTER_CONSUMER_SECRET",
            "TWITTER_ACCESS_TOKEN",
            "TWITTER_ACCESS_TOKEN_SECRET",
        ];

        let values: Vec<Option<String>> = KEYS.iter().map(|&key| get(key)).collect();
        if values.iter().all(Option::is_none) {
            return Ok(None);
        }

        let missing: Vec<&str> = KEYS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(SourceError::Config(format!(
                "Twitter OAuth settings are incomplete, missing {}",
                missing.join(", ")
            )));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        Ok(Some(OAuth1Keys {
            consumer_key: next(),
            consumer_secret: next(),
            token: next(),
            token_secret: next(),
        }))
    }

    fn facebook_config<G>(page_id: &str, get: &G) -> SourceResult<FacebookConfig>
    where
        G: Fn(&str) -> Option<String>,
    {
        let id_regex = Regex::new(r"^[A-Za-z0-9._-]+$")
            .map_err(|e| SourceError::Config(e.to_string()))?;

        if !id_regex.is_match(page_id) {
            return Err(SourceError::Config(format!("Invalid Facebook id: {}", page_id)));
        }

        let album_id = get("FACEBOOK_ALBUM");
        if let Some(album) = &album_id {
            if !id_regex.is_match(album) {
                return Err(SourceError::Config(format!("Invalid Facebook album: {}", album)));
            }
        }

        let credentials = get("FACEBOOK_ACCESS_TOKEN")
            .map(Credentials::AccessToken)
            .unwrap_or(Credentials::None);

        let fetch = FetchConfig::new(
            base_url(get, "FACEBOOK_API_BASE", DEFAULT_FACEBOOK_API_BASE)?,
            page_id,
        )
        .with_credentials(credentials)
        .with_count(parse_count(get, "FACEBOOK_COUNT", DEFAULT_FETCH_COUNT)?);

        Ok(FacebookConfig { fetch, album_id })
    }
}

/// A missing `.env` is fine; one that does not parse is not
fn report_dotenv_error<T>(result: Result<T, dotenvy::Error>) -> SourceResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(SourceError::Config(format!("invalid .env file: {}", e))),
    }
}

fn parse_count<G>(get: &G, key: &str, default: u32) -> SourceResult<u32>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
            SourceError::Config(format!("{} must be a positive integer, got {:?}", key, raw))
        }),
        None => Ok(default),
    }
}

fn base_url<G>(get: &G, key: &str, default: &str) -> SourceResult<String>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => {
            validate_http_url(&raw).map_err(|e| SourceError::Config(format!("{}: {}", key, e)))?;
            Ok(raw.trim_end_matches('/').to_string())
        }
        None => Ok(default.to_string()),
    }
}

fn document_url<G>(get: &G, key: &str) -> SourceResult<Option<String>>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => {
            validate_http_url(&raw).map_err(|e| SourceError::Config(format!("{}: {}", key, e)))?;
            Ok(Some(raw))
        }
        None => Ok(None),
    }
}

pub(crate) fn validate_http_url(raw: &str) -> SourceResult<Url> {
    let parsed = Url::parse(raw).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(SourceError::InvalidUrl(format!(
            "unsupported scheme {:?} in {}",
            other, raw
        ))),
    }
}
