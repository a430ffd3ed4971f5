pub const API_URL: &str = "https://router.huggingface.co/hf-inference/models";
