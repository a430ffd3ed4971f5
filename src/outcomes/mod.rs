pub mod enums;
pub mod log;
pub mod models;
pub mod service;
