pub mod apis;
pub mod classify;
pub mod enums;
pub mod generator;
pub mod models;
pub mod service;
