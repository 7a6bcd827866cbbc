pub mod memory;
pub mod postgres;
pub mod token;
pub mod weatherapi;
