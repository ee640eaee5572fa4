pub mod client;
pub mod endpoints;
pub mod models;
pub mod stats;
