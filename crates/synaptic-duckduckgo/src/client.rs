//! Blocking DuckDuckGo client.
//!
//! Scrapes DuckDuckGo's HTML and Lite endpoints. No API key required.

use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Proxy, StatusCode};
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{
    Backend, BackendError, DuckDuckGoConfig, SafeSearch, TextSearch, TextSearchRequest,
};

const DUCKDUCKGO_BASE: &str = "https://duckduckgo.com/";

type Form = Vec<(String, String)>;

#[derive(Debug, Error)]
pub enum DdgsError {
    #[error("DuckDuckGo request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("DuckDuckGo returned status code: {0}")]
    Status(StatusCode),
    #[error("DuckDuckGo rate limit reached (status {0})")]
    RateLimited(StatusCode),
    #[error("failed to parse DuckDuckGo response: {0}")]
    Parse(String),
    #[error("invalid DuckDuckGo client configuration: {0}")]
    Config(String),
}

/// Blocking [`TextSearch`] client for DuckDuckGo.
///
/// The underlying HTTP client is created on first use, on whichever thread
/// performs the first search.
#[derive(Debug)]
pub struct DdgsClient {
    user_agent: String,
    timeout: Duration,
    proxy: Option<Proxy>,
    html_url: String,
    lite_url: String,
    http: OnceLock<Client>,
}

impl DdgsClient {
    pub fn new() -> Result<Self, DdgsError> {
        Self::from_config(&DuckDuckGoConfig::default())
    }

    pub fn from_config(config: &DuckDuckGoConfig) -> Result<Self, DdgsError> {
        if let Some(reason) = config.invalid_reason() {
            return Err(DdgsError::Config(reason.to_string()));
        }
        let proxy = match config.proxy.as_deref() {
            Some(url) => Some(Proxy::all(url)?),
            None => None,
        };
        Ok(Self {
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            proxy,
            html_url: config.html_url.clone(),
            lite_url: config.lite_url.clone(),
            http: OnceLock::new(),
        })
    }

    // reqwest's blocking client must not be built on an async executor thread.
    fn http(&self) -> Result<&Client, DdgsError> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let mut builder = Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout);
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        let client = builder.build()?;
        Ok(self.http.get_or_init(|| client))
    }

    fn post(&self, url: &str, form: &[(String, String)]) -> Result<String, DdgsError> {
        let response = self.http()?.post(url).form(form).send()?;
        let status = response.status();
        if matches!(
            status,
            StatusCode::ACCEPTED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        ) {
            return Err(DdgsError::RateLimited(status));
        }
        if !status.is_success() {
            return Err(DdgsError::Status(status));
        }
        Ok(response.text()?)
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Html => &self.html_url,
            Endpoint::Lite => &self.lite_url,
        }
    }

    /// Fetch pages from one endpoint until the request's bound is met.
    ///
    /// Without a bound only the first page is read.
    fn search_endpoint(
        &self,
        endpoint: Endpoint,
        request: &TextSearchRequest,
    ) -> Result<Vec<Hit>, DdgsError> {
        let mut form = initial_form(request);
        let mut seen = HashSet::new();
        let mut hits = Vec::new();

        loop {
            let body = self.post(self.endpoint_url(endpoint), &form)?;
            let page = endpoint.parse(&body)?;
            let before = hits.len();
            for hit in page.hits {
                if seen.insert(hit.href.clone()) {
                    hits.push(hit);
                }
            }
            debug!(
                endpoint = endpoint.name(),
                page_results = hits.len() - before,
                total = hits.len(),
                "fetched DuckDuckGo page"
            );

            let Some(limit) = request.max_results else {
                break;
            };
            if hits.len() >= limit || hits.len() == before {
                break;
            }
            match page.next {
                Some(next) => form = next,
                None => break,
            }
        }

        if let Some(limit) = request.max_results {
            hits.truncate(limit);
        }
        Ok(hits)
    }
}

impl TextSearch for DdgsClient {
    fn text(&self, request: &TextSearchRequest) -> Result<Vec<Value>, BackendError> {
        let hits = match request.backend {
            Backend::Html => self.search_endpoint(Endpoint::Html, request)?,
            Backend::Lite => self.search_endpoint(Endpoint::Lite, request)?,
            Backend::Auto => match self.search_endpoint(Endpoint::Html, request) {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(error = %e, "DuckDuckGo html endpoint failed, falling back to lite");
                    self.search_endpoint(Endpoint::Lite, request)?
                }
            },
        };
        Ok(hits.into_iter().map(Hit::into_record).collect())
    }
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Html,
    Lite,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Endpoint::Html => "html",
            Endpoint::Lite => "lite",
        }
    }

    fn parse(self, body: &str) -> Result<Page, DdgsError> {
        match self {
            Endpoint::Html => parse_html_page(body),
            Endpoint::Lite => parse_lite_page(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Hit {
    title: String,
    href: String,
    body: String,
}

impl Hit {
    fn into_record(self) -> Value {
        json!({
            "title": self.title,
            "href": self.href,
            "body": self.body,
        })
    }
}

#[derive(Debug)]
struct Page {
    hits: Vec<Hit>,
    next: Option<Form>,
}

fn safesearch_param(safesearch: SafeSearch) -> &'static str {
    match safesearch {
        SafeSearch::On => "1",
        SafeSearch::Moderate => "-1",
        SafeSearch::Off => "-2",
    }
}

fn initial_form(request: &TextSearchRequest) -> Form {
    let mut form = vec![
        ("q".to_string(), request.keywords.clone()),
        ("kl".to_string(), request.region.as_str().to_string()),
        ("kp".to_string(), safesearch_param(request.safesearch).to_string()),
    ];
    if let Some(timelimit) = request.timelimit {
        form.push(("df".to_string(), timelimit.as_str().to_string()));
    }
    form
}

fn selector(css: &str) -> Result<Selector, DdgsError> {
    Selector::parse(css).map_err(|e| DdgsError::Parse(format!("invalid CSS selector {css:?}: {e:?}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn a result link into the target URL.
///
/// DuckDuckGo redirect links (`/l/?uddg=...`) are unwrapped and sponsored
/// links (`/y.js`) yield `None`.
fn resolve_href(raw: &str) -> Option<String> {
    let absolute = Url::parse(raw).ok();
    let url = match &absolute {
        Some(url) => url.clone(),
        None => Url::parse(DUCKDUCKGO_BASE).ok()?.join(raw).ok()?,
    };

    let is_duckduckgo = url
        .host_str()
        .is_some_and(|host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"));
    if is_duckduckgo {
        if url.path() == "/y.js" {
            return None;
        }
        if url.path().starts_with("/l/") {
            return url
                .query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned());
        }
    }

    match absolute {
        Some(_) => Some(raw.to_string()),
        None => Some(url.into()),
    }
}

/// Fields of the form behind the "Next" button, if the page has one.
fn next_page_form(document: &Html) -> Result<Option<Form>, DdgsError> {
    let form_sel = selector("form")?;
    let submit_sel = selector("input[type=submit]")?;
    let field_sel = selector("input[name]")?;

    for form in document.select(&form_sel) {
        let is_next = form.select(&submit_sel).any(|input| {
            input
                .value()
                .attr("value")
                .is_some_and(|value| value.contains("Next"))
        });
        if !is_next {
            continue;
        }
        let fields = form
            .select(&field_sel)
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or_default();
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        return Ok(Some(fields));
    }
    Ok(None)
}

fn parse_html_page(body: &str) -> Result<Page, DdgsError> {
    let document = Html::parse_document(body);
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut hits = Vec::new();
    for node in document.select(&result_sel) {
        let Some(title) = node.select(&title_sel).next() else {
            continue;
        };
        let Some(href) = title.value().attr("href").and_then(resolve_href) else {
            continue;
        };
        let body = node
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        hits.push(Hit {
            title: element_text(title),
            href,
            body,
        });
    }

    Ok(Page {
        hits,
        next: next_page_form(&document)?,
    })
}

fn parse_lite_page(body: &str) -> Result<Page, DdgsError> {
    let document = Html::parse_document(body);
    let item_sel = selector("a.result-link, td.result-snippet")?;

    let mut hits = Vec::new();
    let mut pending: Option<Hit> = None;
    for element in document.select(&item_sel) {
        if element.value().name() == "a" {
            hits.extend(pending.take());
            pending = element
                .value()
                .attr("href")
                .and_then(resolve_href)
                .map(|href| Hit {
                    title: element_text(element),
                    href,
                    body: String::new(),
                });
        } else if let Some(mut hit) = pending.take() {
            hit.body = element_text(element);
            hits.push(hit);
        }
    }
    hits.extend(pending);

    Ok(Page {
        hits,
        next: next_page_form(&document)?,
    })
}
