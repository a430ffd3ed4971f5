//! In-memory stand-ins for the spreadsheet, generation and chat endpoints.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    app::errors::AppError,
    media::{
        generator::{GenerationFailure, ImageGenerator},
        models::generated_image::GeneratedImage,
    },
    outcomes::log::OutcomeLog,
    prompts::queue::PromptQueue,
    telegram::messenger::Messenger,
};

/// Smallest header imagesize accepts as a PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&13u32.to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[8, 6, 0, 0, 0]);
    data.extend_from_slice(&[0, 0, 0, 0]);
    Bytes::from(data)
}

/// Single-column queue; row 1 is the header.
pub struct FakeQueue {
    rows: Mutex<Vec<String>>,
    deleted: Mutex<Vec<u32>>,
    reads: AtomicUsize,
    read_failures: usize,
    read_error: Option<AppError>,
    deletes: AtomicUsize,
    delete_failures: usize,
    delete_error: Option<AppError>,
    deletes_applied: bool,
}

impl FakeQueue {
    pub fn from_rows(rows: Vec<String>) -> Self {
        Self {
            rows: Mutex::new(rows),
            deleted: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            read_failures: 0,
            read_error: None,
            deletes: AtomicUsize::new(0),
            delete_failures: 0,
            delete_error: None,
            deletes_applied: false,
        }
    }

    pub fn with_prompts(prompts: &[&str]) -> Self {
        let mut rows = vec!["Prompt".to_string()];
        rows.extend(prompts.iter().map(|p| p.to_string()));
        Self::from_rows(rows)
    }

    /// The first `count` column reads fail with `error`.
    pub fn failing_reads(mut self, count: usize, error: AppError) -> Self {
        self.read_failures = count;
        self.read_error = Some(error);
        self
    }

    pub fn failing_deletes(mut self, error: AppError) -> Self {
        self.delete_failures = usize::MAX;
        self.delete_error = Some(error);
        self
    }

    /// The first `count` deletes are applied but still answer with `error`.
    pub fn dropping_delete_responses(mut self, count: usize, error: AppError) -> Self {
        self.delete_failures = count;
        self.delete_error = Some(error);
        self.deletes_applied = true;
        self
    }

    pub fn rows(&self) -> Vec<String> {
        self.rows.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<u32> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PromptQueue for FakeQueue {
    async fn column_values(&self, _column: u32) -> Result<Vec<String>, AppError> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.read_error {
            if read < self.read_failures {
                return Err(error.clone());
            }
        }

        Ok(self.rows())
    }

    async fn row_values(&self, row: u32) -> Result<Vec<String>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(row as usize - 1)
            .map(|value| vec![value.to_string()])
            .unwrap_or_default())
    }

    async fn delete_row(&self, row: u32) -> Result<(), AppError> {
        let attempt = self.deletes.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .delete_error
            .clone()
            .filter(|_| attempt < self.delete_failures);

        if failure.is_none() || self.deletes_applied {
            let mut rows = self.rows.lock().unwrap();
            if (row as usize) <= rows.len() {
                rows.remove(row as usize - 1);
            }
            self.deleted.lock().unwrap().push(row);
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Replays scripted responses; the last one repeats once the script runs out.
pub struct FakeGenerator {
    responses: Vec<Result<Bytes, GenerationFailure>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn always(response: Result<Bytes, GenerationFailure>) -> Self {
        Self::sequence(vec![response])
    }

    pub fn sequence(responses: Vec<Result<Bytes, GenerationFailure>>) -> Self {
        assert!(!responses.is_empty());
        Self {
            responses,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, GenerationFailure> {
        let mut prompts = self.prompts.lock().unwrap();
        let index = prompts.len().min(self.responses.len() - 1);
        prompts.push(prompt.to_string());

        self.responses[index].clone()
    }
}

pub struct FakeMessenger {
    photos: Mutex<Vec<String>>,
    texts: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    error: Option<AppError>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            photos: Mutex::new(Vec::new()),
            texts: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            error: None,
        }
    }

    pub fn failing(error: AppError) -> Self {
        Self {
            error: Some(error),
            ..Self::new()
        }
    }

    /// Captions of delivered photos.
    pub fn photos(&self) -> Vec<String> {
        self.photos.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn attempt(&self) -> Result<(), AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_photo(&self, _image: &GeneratedImage, caption: &str) -> Result<(), AppError> {
        self.attempt()?;
        self.photos.lock().unwrap().push(caption.to_string());
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<(), AppError> {
        self.attempt()?;
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct FakeLog {
    rows: Mutex<Vec<Vec<String>>>,
    attempts: AtomicUsize,
    failures: usize,
    error: Option<AppError>,
    applied: bool,
}

impl FakeLog {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            failures: 0,
            error: None,
            applied: false,
        }
    }

    pub fn failing(error: AppError) -> Self {
        Self::new().refusing(usize::MAX, error)
    }

    /// The first `count` appends are rejected without writing anything.
    pub fn refusing(mut self, count: usize, error: AppError) -> Self {
        self.failures = count;
        self.error = Some(error);
        self.applied = false;
        self
    }

    /// The first `count` appends are written but still answer with `error`.
    pub fn dropping_responses(mut self, count: usize, error: AppError) -> Self {
        self.failures = count;
        self.error = Some(error);
        self.applied = true;
        self
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutcomeLog for FakeLog {
    async fn append_row(&self, values: Vec<String>) -> Result<(), AppError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        let failure = self.error.clone().filter(|_| attempt < self.failures);

        if failure.is_none() || self.applied {
            self.rows.lock().unwrap().push(values);
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
