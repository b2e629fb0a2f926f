pub mod models;
pub mod payload;

pub use models::*;
