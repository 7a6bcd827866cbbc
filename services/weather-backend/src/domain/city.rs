use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A city name, as given by the subscriber.
///
/// The name is kept verbatim: 'Kyiv', 'kyiv' and ' Kyiv' are three different
/// cities as far as subscriptions are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct City(String);

impl City {
    /// Returns an instance of `City` if the input is not blank, is at most
    /// 256 graphemes long, and has no control characters.
    pub fn parse(s: String) -> Result<City, String> {
        let is_empty_or_whitespace = s.trim().is_empty();

        let is_too_long = s.graphemes(true).count() > 256;

        let contains_control_characters = s.chars().any(char::is_control);

        if is_empty_or_whitespace || is_too_long || contains_control_characters {
            Err(format!("{} is not a valid city name.", s.escape_debug()))
        } else {
            Ok(Self(s))
        }
    }
}

impl TryFrom<String> for City {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        City::parse(value)
    }
}

impl From<City> for String {
    fn from(city: City) -> Self {
        city.0
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
