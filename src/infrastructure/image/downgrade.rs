//! Per-host scheme rewriting applied to locators before download.
//!
//! Some providers only serve authenticated media over plain HTTP, so
//! their `https://` links fail the TLS handshake. The rules here are
//! plain data so the exception stays visible in the config file.

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Rewrites the scheme of URLs whose host matches `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowngradeRule {
    /// Host the rule applies to; subdomains match too.
    pub domain: String,
    /// Scheme that triggers the rewrite.
    pub from_scheme: String,
    /// Scheme to use instead.
    pub to_scheme: String,
}

impl DowngradeRule {
    /// Creates an `https` → `http` rule for a domain.
    #[must_use]
    pub fn https_to_http(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            from_scheme: "https".to_string(),
            to_scheme: "http".to_string(),
        }
    }

    /// Checks whether the rule applies to a parsed URL.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        if !url.scheme().eq_ignore_ascii_case(&self.from_scheme) {
            return false;
        }
        url.host_str().is_some_and(|host| host_matches(host, &self.domain))
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    let domain = domain.trim_end_matches('.');
    host.eq_ignore_ascii_case(domain)
        || host
            .len()
            .checked_sub(domain.len() + 1)
            .is_some_and(|split| {
                host.as_bytes()[split] == b'.' && host[split + 1..].eq_ignore_ascii_case(domain)
            })
}

/// Applies the first matching rule to `url`.
///
/// # Returns
/// The rewritten URL, or the original string when no rule matches or the
/// URL cannot be parsed.
#[must_use]
pub fn apply_downgrade(url: &str, rules: &[DowngradeRule]) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let Some(rule) = rules.iter().find(|rule| rule.matches(&parsed)) else {
        return url.to_string();
    };

    // Only the scheme changes; the rest of the locator is kept verbatim.
    match url.find("://") {
        Some(idx) => format!("{}{}", rule.to_scheme, &url[idx..]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qq_rules() -> Vec<DowngradeRule> {
        vec![DowngradeRule::https_to_http("multimedia.nt.qq.com.cn")]
    }

    #[test]
    fn test_downgrade_matching_host() {
        let url = "https://multimedia.nt.qq.com.cn/download?appid=1407&fileid=abc";
        assert_eq!(
            apply_downgrade(url, &qq_rules()),
            "http://multimedia.nt.qq.com.cn/download?appid=1407&fileid=abc"
        );
    }

    #[test]
    fn test_downgrade_subdomain() {
        let url = "https://cdn.multimedia.nt.qq.com.cn/a.png";
        assert_eq!(
            apply_downgrade(url, &qq_rules()),
            "http://cdn.multimedia.nt.qq.com.cn/a.png"
        );
    }

    #[test]
    fn test_lookalike_host_unchanged() {
        let url = "https://evilmultimedia.nt.qq.com.cn/a.png";
        assert_eq!(apply_downgrade(url, &qq_rules()), url);

        let url = "https://multimedia.nt.qq.com.cn.example.org/a.png";
        assert_eq!(apply_downgrade(url, &qq_rules()), url);
    }

    #[test]
    fn test_other_hosts_unchanged() {
        let url = "https://example.com/image.png";
        assert_eq!(apply_downgrade(url, &qq_rules()), url);
    }

    #[test]
    fn test_already_insecure_unchanged() {
        let url = "http://multimedia.nt.qq.com.cn/a.jpg";
        assert_eq!(apply_downgrade(url, &qq_rules()), url);
    }

    #[test]
    fn test_invalid_url_unchanged() {
        assert_eq!(apply_downgrade("not a url", &qq_rules()), "not a url");
    }

    #[test]
    fn test_no_rules() {
        let url = "https://multimedia.nt.qq.com.cn/a.jpg";
        assert_eq!(apply_downgrade(url, &[]), url);
    }
}
