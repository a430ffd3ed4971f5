pub mod google;
pub mod reqwest;
pub mod retry;
pub mod scheduler;
pub mod time;
