//! Contact-field extraction. Runs once over the whole document, independent of
//! section scanning.

use std::sync::LazyLock;

use regex::{Match, Regex};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid regex: email")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}")
        .expect("Invalid regex: phone")
});

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[\w-]+").expect("Invalid regex: linkedin")
});

static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[\w-]+").expect("Invalid regex: github")
});

static URL_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?[a-z0-9-]+(?:\.[a-z0-9-]+)*\.([a-z]{2,})(/\S*)?")
        .expect("Invalid regex: url")
});

/// Hosts that are never a personal site.
const EXCLUDED_HOSTS: &[&str] = &["linkedin", "github", "gmail"];

/// Bare `name.tld` candidates need one of these TLDs; otherwise "Node.js" would
/// count as a website.
const WEB_TLDS: &[&str] = &[
    "com", "net", "org", "io", "dev", "me", "app", "co", "ai", "tech", "site", "xyz", "info",
    "page", "design", "online", "blog", "us", "uk", "ca", "in",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

/// Extracts the first email, phone, LinkedIn, GitHub and portfolio URL in `text`.
pub fn extract_contact(text: &str) -> ContactInfo {
    ContactInfo {
        email: first_match(&EMAIL, text),
        phone: first_match(&PHONE, text),
        linkedin: first_match(&LINKEDIN, text),
        github: first_match(&GITHUB, text),
        portfolio: find_portfolio(text).unwrap_or_default(),
    }
}

fn first_match(regex: &Regex, text: &str) -> String {
    regex
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn find_portfolio(text: &str) -> Option<String> {
    URL_LIKE.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        if is_embedded(text, &whole) {
            return None;
        }

        let candidate = whole.as_str().trim_end_matches(['.', ',', ';', ')']);
        let lowered = candidate.to_lowercase();
        if EXCLUDED_HOSTS.iter().any(|host| lowered.contains(host)) {
            return None;
        }

        let explicit = caps.get(1).is_some() || caps.get(2).is_some() || caps.get(4).is_some();
        let tld = caps.get(3).map(|m| m.as_str().to_lowercase()).unwrap_or_default();
        (explicit || WEB_TLDS.contains(&tld.as_str())).then(|| candidate.to_string())
    })
}

/// True when the match is glued to surrounding text, e.g. the domain half of an
/// email address or the local part before `@`.
fn is_embedded(text: &str, m: &Match<'_>) -> bool {
    let before = text[..m.start()].chars().next_back();
    let after = text[m.end()..].chars().next();
    matches!(before, Some('@') | Some('.') | Some('/'))
        || before.is_some_and(char::is_alphanumeric)
        || after == Some('@')
}
