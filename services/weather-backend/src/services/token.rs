use rand::Rng;

use crate::domain::ports::secondary::TokenGenerator;
use crate::domain::SubscriptionToken;

/// Issues 128 bit random tokens, as 32 lowercase hex characters.
#[derive(Debug, Clone, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> SubscriptionToken {
        let value: u128 = rand::thread_rng().gen();
        SubscriptionToken::new(format!("{value:032x}"))
    }
}
