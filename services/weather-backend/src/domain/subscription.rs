use serde::{Deserialize, Serialize};

use crate::domain::{City, Frequency, SubscriberEmail, SubscriptionToken};

/// A stored subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub email: SubscriberEmail,
    pub city: City,
    pub frequency: Frequency,
    pub token: SubscriptionToken,
    /// Set once, when the subscriber follows the confirmation link.
    pub confirmed: bool,
}

impl Subscription {
    /// A new, unconfirmed, subscription.
    pub fn new(subscription: NewSubscription, token: SubscriptionToken) -> Self {
        let NewSubscription {
            email,
            city,
            frequency,
        } = subscription;
        Subscription {
            email,
            city,
            frequency,
            token,
            confirmed: false,
        }
    }
}

/// A validated subscription request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub city: City,
    pub frequency: Frequency,
}

impl TryFrom<SubscriptionRequest> for NewSubscription {
    type Error = String;

    fn try_from(request: SubscriptionRequest) -> Result<Self, Self::Error> {
        let SubscriptionRequest {
            email,
            city,
            frequency,
        } = request;

        let email = SubscriberEmail::try_from(email)?;

        let city = City::try_from(city)?;

        let frequency = frequency.parse()?;

        Ok(NewSubscription {
            email,
            city,
            frequency,
        })
    }
}

/// This is the information sent by the user to request a subscription.
///
/// Missing fields deserialize as empty strings, and are rejected during validation.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub frequency: String,
}
