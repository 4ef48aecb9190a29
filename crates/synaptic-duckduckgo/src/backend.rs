use serde_json::Value;

/// Error returned by a [`TextSearch`] backend. Passed through to callers untouched.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Region restriction for a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Region {
    /// No region restriction (`wt-wt`).
    #[default]
    Worldwide,
    /// A DuckDuckGo region code such as `us-en` or `de-de`.
    Code(String),
}

impl Region {
    pub fn as_str(&self) -> &str {
        match self {
            Region::Worldwide => "wt-wt",
            Region::Code(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafeSearch {
    On,
    #[default]
    Moderate,
    Off,
}

impl SafeSearch {
    pub fn as_str(self) -> &'static str {
        match self {
            SafeSearch::On => "on",
            SafeSearch::Moderate => "moderate",
            SafeSearch::Off => "off",
        }
    }
}

/// Restrict results to pages updated within the last day, week, month or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLimit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeLimit {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeLimit::Day => "d",
            TimeLimit::Week => "w",
            TimeLimit::Month => "m",
            TimeLimit::Year => "y",
        }
    }
}

/// Which DuckDuckGo endpoint serves the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Let the client choose, falling back between endpoints.
    #[default]
    Auto,
    Html,
    Lite,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Html => "html",
            Backend::Lite => "lite",
        }
    }
}

/// A single text search handed to a [`TextSearch`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearchRequest {
    pub keywords: String,
    pub region: Region,
    pub safesearch: SafeSearch,
    pub timelimit: Option<TimeLimit>,
    pub backend: Backend,
    /// Upper bound on returned records. `None` reads only the first response page.
    pub max_results: Option<usize>,
}

/// Synchronous text-search primitive of a search provider.
///
/// Implementations may block; callers are expected to run them off the
/// async executor. Each record should be a JSON object carrying string
/// `title`, `href` and `body` fields, but the shape is only checked by the
/// caller.
pub trait TextSearch: Send + Sync {
    fn text(&self, request: &TextSearchRequest) -> Result<Vec<Value>, BackendError>;
}
