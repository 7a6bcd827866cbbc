/// Implementation of the subscription storage kept in process memory.
///
/// Nothing survives a restart, this is used for development and tests.
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::ports::secondary::{StorageError as Error, SubscriptionStorage};
use crate::domain::{Subscription, SubscriptionToken};

/// Subscriptions indexed by their token.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl InMemoryStorage {
    /// Tokens of all the stored subscriptions, in no particular order.
    pub async fn tokens(&self) -> Vec<SubscriptionToken> {
        self.subscriptions
            .read()
            .await
            .values()
            .map(|subscription| subscription.token.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscriptions.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionStorage for InMemoryStorage {
    async fn exists_for(&self, email: &str, city: &str) -> Result<bool, Error> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .values()
            .any(|s| s.email.as_ref() == email && s.city.as_ref() == city))
    }

    #[tracing::instrument(name = "Storing a new subscription in memory", skip(self))]
    async fn insert(&self, subscription: &Subscription) -> Result<(), Error> {
        // The uniqueness check and the insertion happen under the same write lock.
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions
            .values()
            .any(|s| s.email == subscription.email && s.city == subscription.city)
        {
            return Err(Error::Duplicate {
                context: format!(
                    "Subscription for {} to {} already exists",
                    subscription.email, subscription.city
                ),
            });
        }
        if subscriptions.contains_key(subscription.token.as_ref()) {
            return Err(Error::TokenConflict {
                context: "Subscription token already in use".to_string(),
            });
        }
        subscriptions.insert(subscription.token.to_string(), subscription.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Subscription, Error> {
        self.subscriptions
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| not_found(token))
    }

    async fn mark_confirmed(&self, token: &str) -> Result<(), Error> {
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions.get_mut(token).ok_or_else(|| not_found(token))?;
        subscription.confirmed = true;
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), Error> {
        self.subscriptions
            .write()
            .await
            .remove(token)
            .map(|_| ())
            .ok_or_else(|| not_found(token))
    }
}

fn not_found(token: &str) -> Error {
    Error::NotFound {
        context: format!("No subscription with token {token}"),
    }
}
