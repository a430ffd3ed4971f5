pub mod config;
pub mod messenger;
pub mod service;
