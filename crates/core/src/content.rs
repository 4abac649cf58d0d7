//! Content identification types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of title a stream request is for.
///
/// Series ids carry a `:season:episode` suffix on top of the base id;
/// movies use the base id directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    /// String form used in URLs and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized content type strings.
#[derive(Debug, Error)]
#[error("unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentType::Movie),
            "series" => Ok(ContentType::Series),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_round_trip() {
        assert_eq!("movie".parse::<ContentType>().unwrap(), ContentType::Movie);
        assert_eq!(
            "series".parse::<ContentType>().unwrap(),
            ContentType::Series
        );
        assert_eq!(ContentType::Movie.as_str(), "movie");
        assert_eq!(ContentType::Series.as_str(), "series");
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!("channel".parse::<ContentType>().is_err());
        assert!("".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentType::Series).unwrap(),
            "\"series\""
        );
        let parsed: ContentType = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(parsed, ContentType::Movie);
    }
}
