use serde::{Deserialize, Serialize};

/// Current weather conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    pub description: String,
    /// Relative humidity, in percent
    pub humidity: i32,
}
