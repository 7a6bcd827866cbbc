pub mod subscription_storage;
pub mod token_generator;
pub mod weather_provider;

pub use subscription_storage::{Error as StorageError, SubscriptionStorage};
pub use token_generator::TokenGenerator;
pub use weather_provider::{Error as WeatherError, WeatherProvider};

#[cfg(test)]
pub use subscription_storage::MockSubscriptionStorage;

#[cfg(test)]
pub use token_generator::MockTokenGenerator;

#[cfg(test)]
pub use weather_provider::MockWeatherProvider;
