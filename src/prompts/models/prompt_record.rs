/// A prompt read from the queue, identified only by the row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub text: String,
    pub row: u32,
}

impl PromptRecord {
    pub fn new(text: String, row: u32) -> Self {
        Self { text, row }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
