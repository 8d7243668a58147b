use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Token lifetime; serialized as seconds with `-1` meaning no expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TokenTimeout {
    Never,
    Seconds(u64),
}

impl TokenTimeout {
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Seconds(secs) => Some(Duration::from_secs(*secs)),
        }
    }

    pub fn as_secs(&self) -> i64 {
        match self {
            Self::Never => -1,
            Self::Seconds(secs) => *secs as i64,
        }
    }
}

impl From<i64> for TokenTimeout {
    fn from(secs: i64) -> Self {
        if secs < 0 {
            Self::Never
        } else {
            Self::Seconds(secs as u64)
        }
    }
}

impl From<TokenTimeout> for i64 {
    fn from(timeout: TokenTimeout) -> Self {
        timeout.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_means_never() {
        assert_eq!(TokenTimeout::from(-1), TokenTimeout::Never);
        assert_eq!(TokenTimeout::Never.as_duration(), None);
        assert_eq!(TokenTimeout::from(60).as_duration(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_serialized_as_seconds() {
        assert_eq!(serde_json::to_string(&TokenTimeout::Never).unwrap(), "-1");
        let timeout: TokenTimeout = serde_json::from_str("3600").unwrap();
        assert_eq!(timeout, TokenTimeout::Seconds(3600));
    }
}
