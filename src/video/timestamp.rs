use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{PreinitError, Result};

/// Fixed timestamp format embedded in chunk names, minute granularity.
pub const TOKEN_FORMAT: &str = "%Y%m%d_%H%M";

/// Capture timestamp token parsed from a chunk's stem name.
///
/// The token is the first "digits underscore digits" run in the stem
/// (date and time concatenated by the capture naming convention). It is
/// lexically comparable: under the fixed format, lexical order matches
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureToken(String);

impl CaptureToken {
    /// Extract the capture token from a chunk stem.
    pub fn from_stem(stem: &str) -> Result<Self> {
        let pattern = Regex::new(r"\d+_\d+").expect("valid token pattern");
        match pattern.find(stem) {
            Some(m) => Ok(CaptureToken(m.as_str().to_string())),
            None => Err(PreinitError::MalformedChunkName(stem.to_string())),
        }
    }

    /// Parse the token as a wall-clock timestamp.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, TOKEN_FORMAT).map_err(|source| {
            PreinitError::BadTimestamp {
                token: self.0.clone(),
                source,
            }
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaptureToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
