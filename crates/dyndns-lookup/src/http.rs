// # Plain-Text HTTP Lookup
//
// Generic lookup against IP echo services such as `ifconfig.co` or
// `ipinfo.io/ip`. Each service is described by a `ServiceDescriptor`:
//
// - Without a pattern, the body must *start* with a dotted quad
//   (`203.0.113.7\n`, `203.0.113.7 some trailer`).
// - With a pattern, the pattern is searched anywhere in the body, `.`
//   also matching newlines, and the named group `ip` is returned.
//
// This method never fails: transport errors, bad statuses and unusable
// bodies are logged as warnings and reported as an empty address.

use dyndns_core::ServiceDescriptor;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::warn;

use crate::fetch::HttpFetcher;

/// Longest body that is quoted verbatim in a warning
const MAX_LOGGED_BODY_CHARS: usize = 50;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+\.\d+\.\d+)").expect("dotted-quad pattern is valid")
});

/// Lookup against one plain-text echo service at a time
#[derive(Debug, Clone)]
pub struct HttpTextLookup {
    fetcher: HttpFetcher,
}

impl HttpTextLookup {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    /// Query `service` and extract the address
    ///
    /// # Returns
    ///
    /// The address, or `""` if anything went wrong
    pub async fn lookup(&self, service: &ServiceDescriptor) -> String {
        let url = service.request_url();
        match self.fetcher.get_text(&url).await {
            Ok(body) => extract_ip(&body, service.re.as_deref()),
            Err(e) => {
                warn!("IP lookup via {} failed: {}", url, e);
                String::new()
            }
        }
    }
}

/// Extract the address from a response body
///
/// With `pattern`, returns the named `ip` group of the first match; without
/// one, returns the dotted quad the body starts with. Returns `""` (and logs
/// a warning) when nothing usable is found.
pub fn extract_ip(body: &str, pattern: Option<&str>) -> String {
    match pattern {
        Some(pattern) => extract_with_pattern(body, pattern),
        None => extract_dotted_quad(body),
    }
}

fn extract_with_pattern(body: &str, pattern: &str) -> String {
    let re = match RegexBuilder::new(pattern).dot_matches_new_line(true).build() {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid extraction pattern {:?}: {}", pattern, e);
            return String::new();
        }
    };

    let Some(captures) = re.captures(body) else {
        warn!("Pattern {:?} did not match the response", pattern);
        return String::new();
    };

    match captures.name("ip") {
        Some(ip) => ip.as_str().to_string(),
        None => {
            warn!("Pattern {:?} matched but captured no 'ip' group", pattern);
            String::new()
        }
    }
}

fn extract_dotted_quad(body: &str) -> String {
    match DOTTED_QUAD.captures(body).and_then(|c| c.get(1)) {
        Some(ip) => ip.as_str().to_string(),
        None => {
            warn!("Unexpected response: {}", loggable_body(body));
            String::new()
        }
    }
}

/// Short bodies are worth seeing; long ones are usually HTML error pages
fn loggable_body(body: &str) -> &str {
    if body.chars().count() <= MAX_LOGGED_BODY_CHARS {
        body
    } else {
        "suspicious response"
    }
}
