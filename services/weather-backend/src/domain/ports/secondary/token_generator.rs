use crate::domain::SubscriptionToken;

/// Source of subscription tokens.
///
/// Every call must return a token that was never returned before.
#[cfg_attr(test, mockall::automock)]
pub trait TokenGenerator {
    fn generate(&self) -> SubscriptionToken;
}
