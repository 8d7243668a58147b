//! Browser and OS labels from a `User-Agent` header

use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentInfo {
    pub browser: String,
    pub os: String,
}

// Order matters: Edge and Opera also announce Chrome, Chrome also announces Safari.
const BROWSERS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("Firefox/", "Firefox"),
    ("Chrome/", "Chrome"),
    ("Version/", "Safari"),
    ("MSIE ", "Internet Explorer"),
    ("Trident/", "Internet Explorer"),
];

const SYSTEMS: &[(&str, &str)] = &[
    ("Windows NT", "Windows"),
    ("Android", "Android"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Mac OS X", "Mac OS X"),
    ("CrOS", "Chrome OS"),
    ("Linux", "Linux"),
];

impl UserAgentInfo {
    pub fn parse(user_agent: &str) -> Self {
        Self {
            browser: detect_browser(user_agent),
            os: detect(user_agent, SYSTEMS).unwrap_or(UNKNOWN).to_string(),
        }
    }
}

fn detect(user_agent: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    table
        .iter()
        .find(|(marker, _)| user_agent.contains(marker))
        .map(|(_, label)| *label)
}

fn detect_browser(user_agent: &str) -> String {
    let Some((marker, label)) = BROWSERS
        .iter()
        .find(|(marker, _)| user_agent.contains(marker))
    else {
        return UNKNOWN.to_string();
    };

    // "Chrome/120.0.6099.109" -> "Chrome 120"
    let major = user_agent
        .split(marker)
        .nth(1)
        .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
        .filter(|v| !v.is_empty());
    match major {
        Some(version) => format!("{} {}", label, version),
        None => label.to_string(),
    }
}
