pub mod models;
pub mod queue;
pub mod service;
