//! Default values for configuration

/// Default git branch holding the readings file
pub fn default_branch() -> String {
    "main".to_string()
}

/// Default path of the readings file inside the repository
pub fn default_file_path() -> String {
    "_data/readings.json".to_string()
}

/// Default GitHub API base URL
pub fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// Default environment variable name for the access token
pub fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

/// Default number of retries after a stale-revision conflict
pub fn default_conflict_retries() -> u32 {
    2
}

/// Default page fetch timeout in seconds
pub fn default_fetch_timeout() -> u64 {
    15
}

/// Default user agent for page fetches
pub fn default_fetch_user_agent() -> String {
    format!("pagemark/{} (Reading List)", env!("CARGO_PKG_VERSION"))
}
