use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token identifying a subscription for confirmation and unsubscription.
///
/// Tokens are issued by a `TokenGenerator` when the subscription is created,
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionToken(String);

impl SubscriptionToken {
    pub fn new<S: Into<String>>(s: S) -> Self {
        SubscriptionToken(s.into())
    }
}

impl AsRef<str> for SubscriptionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<SubscriptionToken> for String {
    fn from(token: SubscriptionToken) -> Self {
        token.0
    }
}
