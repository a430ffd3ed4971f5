pub const API_URL: &str = "https://api.telegram.org";
pub const CAPTION_LIMIT: usize = 1024;
pub const TEXT_LIMIT: usize = 4096;
