use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often the subscriber wants weather updates.
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[sqlx(type_name = "frequency")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    Daily,
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Frequency::Hourly),
            "daily" => Ok(Frequency::Daily),
            _ => Err(format!(
                "{s} is not a valid frequency, expected 'hourly' or 'daily'."
            )),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
