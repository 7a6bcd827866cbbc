use async_trait::async_trait;
use common::err_context::ErrorContextExt;

use super::PostgresStorage;
use crate::domain::{
    ports::secondary::StorageError as Error, ports::secondary::SubscriptionStorage, City,
    Frequency, SubscriberEmail, Subscription, SubscriptionToken,
};

/// Name of the unique constraint on (email, city), see the migrations.
const EMAIL_CITY_CONSTRAINT: &str = "subscriptions_email_city_key";
/// Primary key of the subscriptions table, on the token.
const TOKEN_CONSTRAINT: &str = "subscriptions_pkey";

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    token: String,
    email: String,
    city: String,
    frequency: Frequency,
    confirmed: bool,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(row.email).map_err(|err| Error::Validation {
            context: format!("Invalid email stored in the database: {err}"),
        })?;
        let city = City::parse(row.city).map_err(|err| Error::Validation {
            context: format!("Invalid city stored in the database: {err}"),
        })?;
        Ok(Subscription {
            email,
            city,
            frequency: row.frequency,
            token: SubscriptionToken::new(row.token),
            confirmed: row.confirmed,
        })
    }
}

#[async_trait]
impl SubscriptionStorage for PostgresStorage {
    #[tracing::instrument(name = "Checking for an existing subscription in postgres", skip(self))]
    async fn exists_for(&self, email: &str, city: &str) -> Result<bool, Error> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM subscriptions WHERE email = $1 AND city = $2)"#,
        )
        .bind(email)
        .bind(city)
        .fetch_one(&self.pool)
        .await
        .context(format!("Could not check subscription for {email} to {city}"))?;
        Ok(exists)
    }

    #[tracing::instrument(name = "Storing a new subscription in postgres", skip(self))]
    async fn insert(&self, subscription: &Subscription) -> Result<(), Error> {
        let res = sqlx::query(
            r#"INSERT INTO subscriptions (token, email, city, frequency, confirmed) VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(subscription.token.as_ref())
        .bind(subscription.email.as_ref())
        .bind(subscription.city.as_ref())
        .bind(subscription.frequency)
        .bind(subscription.confirmed)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.constraint() == Some(EMAIL_CITY_CONSTRAINT) =>
            {
                Err(Error::Duplicate {
                    context: format!(
                        "Subscription for {} to {} already exists",
                        subscription.email, subscription.city
                    ),
                })
            }
            Err(sqlx::Error::Database(db_err)) if db_err.constraint() == Some(TOKEN_CONSTRAINT) => {
                Err(Error::TokenConflict {
                    context: "Subscription token already in use".to_string(),
                })
            }
            Err(err) => Err(err)
                .context(format!(
                    "Could not store new subscription for {}",
                    subscription.email
                ))
                .map_err(Error::from),
        }
    }

    #[tracing::instrument(name = "Fetching a subscription by token in postgres", skip(self))]
    async fn find_by_token(&self, token: &str) -> Result<Subscription, Error> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"SELECT token, email, city, frequency, confirmed FROM subscriptions WHERE token = $1"#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context(format!("Could not get subscription for token {token}"))?;

        match row {
            Some(row) => Subscription::try_from(row),
            None => Err(Error::NotFound {
                context: format!("No subscription with token {token}"),
            }),
        }
    }

    #[tracing::instrument(name = "Confirming a subscription in postgres", skip(self))]
    async fn mark_confirmed(&self, token: &str) -> Result<(), Error> {
        let res = sqlx::query(r#"UPDATE subscriptions SET confirmed = TRUE WHERE token = $1"#)
            .bind(token)
            .execute(&self.pool)
            .await
            .context(format!("Could not confirm subscription for token {token}"))?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound {
                context: format!("No subscription with token {token}"),
            });
        }
        Ok(())
    }

    #[tracing::instrument(name = "Deleting a subscription in postgres", skip(self))]
    async fn delete_by_token(&self, token: &str) -> Result<(), Error> {
        let res = sqlx::query(r#"DELETE FROM subscriptions WHERE token = $1"#)
            .bind(token)
            .execute(&self.pool)
            .await
            .context(format!("Could not delete subscription for token {token}"))?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound {
                context: format!("No subscription with token {token}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use common::settings::Settings;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use speculoos::prelude::*;
    use std::path::PathBuf;

    use super::*;
    use crate::domain::{NewSubscription, SubscriptionRequest};
    use crate::services::token::RandomTokenGenerator;
    use crate::domain::ports::secondary::TokenGenerator;

    /// Connects to the database described by the 'dev' profile.
    async fn dev_storage() -> PostgresStorage {
        let config_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config");
        let settings: Settings = common::config::merge_configuration(
            &config_dir,
            &["service", "database", "weather"],
            "dev",
            "WEATHER",
            vec![],
        )
        .expect("configuration")
        .try_deserialize()
        .expect("settings");
        PostgresStorage::new(settings.database)
            .await
            .expect("development database")
    }

    fn new_subscription() -> Subscription {
        let request = SubscriptionRequest {
            email: SafeEmail().fake::<String>(),
            city: "Kyiv".to_string(),
            frequency: "daily".to_string(),
        };
        let new_subscription = NewSubscription::try_from(request).unwrap();
        Subscription::new(new_subscription, RandomTokenGenerator.generate())
    }

    #[tokio::test]
    #[ignore = "requires a running postgres instance"]
    async fn storage_should_store_and_retrieve_subscription() {
        let storage = dev_storage().await;
        let lhs = new_subscription();

        storage.insert(&lhs).await.expect("storing subscription");

        let rhs = storage
            .find_by_token(lhs.token.as_ref())
            .await
            .expect("getting subscription");

        assert_that(&rhs).is_equal_to(&lhs);
        let exists = storage
            .exists_for(lhs.email.as_ref(), lhs.city.as_ref())
            .await
            .expect("checking subscription");
        assert_that(&exists).is_true();
    }

    #[tokio::test]
    #[ignore = "requires a running postgres instance"]
    async fn storage_should_reject_a_duplicate_email_and_city() {
        let storage = dev_storage().await;
        let first = new_subscription();
        storage.insert(&first).await.expect("storing subscription");

        let mut second = new_subscription();
        second.email = first.email.clone();
        let res = storage.insert(&second).await;

        assert!(matches!(res, Err(Error::Duplicate { .. })));
    }

    #[tokio::test]
    #[ignore = "requires a running postgres instance"]
    async fn storage_should_report_a_reused_token_as_a_token_conflict() {
        let storage = dev_storage().await;
        let first = new_subscription();
        storage.insert(&first).await.expect("storing subscription");

        let mut second = new_subscription();
        second.token = first.token.clone();
        let res = storage.insert(&second).await;

        assert!(matches!(res, Err(Error::TokenConflict { .. })));
    }

    #[tokio::test]
    #[ignore = "requires a running postgres instance"]
    async fn storage_should_confirm_then_delete_subscription() {
        let storage = dev_storage().await;
        let subscription = new_subscription();
        let token = subscription.token.as_ref();
        storage
            .insert(&subscription)
            .await
            .expect("storing subscription");

        storage.mark_confirmed(token).await.expect("confirming");
        let confirmed = storage.find_by_token(token).await.expect("subscription");
        assert_that(&confirmed.confirmed).is_true();

        storage.delete_by_token(token).await.expect("deleting");
        assert!(matches!(
            storage.find_by_token(token).await,
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            storage.delete_by_token(token).await,
            Err(Error::NotFound { .. })
        ));
    }
}
