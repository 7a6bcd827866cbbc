pub mod city;
pub mod frequency;
pub mod ports;
pub mod service;
pub mod subscriber_email;
pub mod subscription;
pub mod token;
pub mod weather;

pub use city::City;
pub use frequency::Frequency;
pub use service::SubscriptionService;
pub use subscriber_email::SubscriberEmail;
pub use subscription::{NewSubscription, Subscription, SubscriptionRequest};
pub use token::SubscriptionToken;
pub use weather::Weather;
