/// Subscription lifecycle (subscribe, confirm, unsubscribe) and weather lookups.
///
/// A subscription is created unconfirmed, confirmed at most once, and removed
/// for good when the subscriber unsubscribes:
///
///    Created --confirm--> Confirmed --confirm--> Confirmed
///    Created | Confirmed --unsubscribe--> (deleted)
use std::fmt;
use std::sync::Arc;

use crate::domain::ports::secondary::{
    StorageError, SubscriptionStorage, TokenGenerator, WeatherError, WeatherProvider,
};
use crate::domain::{NewSubscription, Subscription, Weather};

pub type DynSubscriptionStorage = Arc<dyn SubscriptionStorage + Send + Sync>;
pub type DynWeatherProvider = Arc<dyn WeatherProvider + Send + Sync>;
pub type DynTokenGenerator = Arc<dyn TokenGenerator + Send + Sync>;

/// Holds nothing but shared handles, so a single instance can serve
/// concurrent requests.
#[derive(Clone)]
pub struct SubscriptionService {
    storage: DynSubscriptionStorage,
    weather: DynWeatherProvider,
    tokens: DynTokenGenerator,
}

impl SubscriptionService {
    pub fn new(
        storage: DynSubscriptionStorage,
        weather: DynWeatherProvider,
        tokens: DynTokenGenerator,
    ) -> Self {
        SubscriptionService {
            storage,
            weather,
            tokens,
        }
    }

    /// Stores a new, unconfirmed, subscription.
    ///
    /// Fails with `Error::AlreadySubscribed` if there is already a subscription
    /// for the same email and city, whether it is confirmed or not.
    #[tracing::instrument(name = "Subscribing", skip(self))]
    pub async fn subscribe(&self, subscription: NewSubscription) -> Result<(), Error> {
        let exists = self
            .storage
            .exists_for(subscription.email.as_ref(), subscription.city.as_ref())
            .await
            .map_err(|source| Error::Storage {
                context: "Could not check for an existing subscription".to_string(),
                source,
            })?;

        if exists {
            return Err(Error::AlreadySubscribed {
                context: format!(
                    "{} is already subscribed to {}",
                    subscription.email, subscription.city
                ),
            });
        }

        let token = self.tokens.generate();
        let subscription = Subscription::new(subscription, token);

        // The check above is only a shortcut, the storage has the final word.
        match self.storage.insert(&subscription).await {
            Ok(()) => {
                tracing::info!(
                    city = %subscription.city,
                    frequency = %subscription.frequency,
                    "New subscription stored"
                );
                // TODO Send the confirmation email with the link to /api/confirm/{token}
                Ok(())
            }
            Err(StorageError::Duplicate { context }) => Err(Error::AlreadySubscribed { context }),
            Err(source) => Err(Error::Storage {
                context: "Could not store new subscription".to_string(),
                source,
            }),
        }
    }

    /// Confirms the subscription identified by the token.
    ///
    /// Confirming an already confirmed subscription succeeds without any change.
    #[tracing::instrument(name = "Confirming subscription", skip(self))]
    pub async fn confirm(&self, token: &str) -> Result<(), Error> {
        let subscription = self
            .storage
            .find_by_token(token)
            .await
            .map_err(|err| token_error(err, "Could not find subscription by token"))?;

        if subscription.confirmed {
            tracing::debug!("Subscription already confirmed");
            return Ok(());
        }

        self.storage
            .mark_confirmed(token)
            .await
            .map_err(|err| token_error(err, "Could not confirm subscription"))
    }

    /// Deletes the subscription identified by the token, confirmed or not.
    #[tracing::instrument(name = "Unsubscribing", skip(self))]
    pub async fn unsubscribe(&self, token: &str) -> Result<(), Error> {
        self.storage
            .find_by_token(token)
            .await
            .map_err(|err| token_error(err, "Could not find subscription by token"))?;

        self.storage
            .delete_by_token(token)
            .await
            .map_err(|err| token_error(err, "Could not delete subscription"))
    }

    /// Current weather for the city, as reported by the weather provider.
    #[tracing::instrument(name = "Fetching weather forecast", skip(self))]
    pub async fn weather_forecast(&self, city: &str) -> Result<Weather, Error> {
        self.weather
            .fetch_forecast(city)
            .await
            .map_err(|err| match err {
                WeatherError::CityNotFound { context } => Error::CityNotFound { context },
                source => Error::Upstream {
                    context: format!("Could not fetch weather forecast for {city}"),
                    source,
                },
            })
    }
}

/// Storage 'not found' means the token is unknown, anything else is a storage failure.
fn token_error(err: StorageError, context: &str) -> Error {
    match err {
        StorageError::NotFound { context } => Error::TokenNotFound { context },
        source => Error::Storage {
            context: context.to_string(),
            source,
        },
    }
}

#[derive(Debug)]
pub enum Error {
    AlreadySubscribed {
        context: String,
    },
    TokenNotFound {
        context: String,
    },
    CityNotFound {
        context: String,
    },
    /// The weather provider failed for another reason than an unknown city
    Upstream {
        context: String,
        source: WeatherError,
    },
    Storage {
        context: String,
        source: StorageError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AlreadySubscribed { context } => {
                write!(fmt, "Already subscribed: {context}")
            }
            Error::TokenNotFound { context } => {
                write!(fmt, "Token not found: {context}")
            }
            Error::CityNotFound { context } => {
                write!(fmt, "City not found: {context}")
            }
            Error::Upstream { context, source } => {
                write!(fmt, "Weather Provider Error: {context} | {source}")
            }
            Error::Storage { context, source } => {
                write!(fmt, "Storage Error: {context} | {source}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Upstream { source, .. } => Some(source),
            Error::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}
