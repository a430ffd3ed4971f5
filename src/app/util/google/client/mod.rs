pub mod config;
pub mod google_client;
