pub mod ci;
pub mod database;
