use log::{ error, info };
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::api::{ CopyKind, DocsApi };
use crate::clipboard::Clipboard;
use crate::render::CodeBlock;

pub const ACK_LABEL: &str = "Copied!";
pub const ERROR_LABEL: &str = "Error";
pub const CODE_COPY_LABEL: &str = "Copy";
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// A clickable label that briefly shows feedback and then reverts to its
/// resting text. Only the most recent flash reverts the label.
#[derive(Clone, Debug)]
pub struct CopyTrigger {
    resting: String,
    label: Arc<Mutex<String>>,
    generation: Arc<AtomicU64>,
}

impl CopyTrigger {
    pub fn new(label: impl Into<String>) -> Self {
        let resting = label.into();
        Self {
            label: Arc::new(Mutex::new(resting.clone())),
            resting,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn for_kind(kind: CopyKind) -> Self {
        Self::new(kind.label())
    }

    pub fn code_button() -> Self {
        Self::new(CODE_COPY_LABEL)
    }

    pub fn label(&self) -> String {
        self.label.lock().map(|l| l.clone()).unwrap_or_else(|_| self.resting.clone())
    }

    fn set_label(label: &Mutex<String>, text: &str) {
        if let Ok(mut current) = label.lock() {
            *current = text.to_string();
        }
    }

    /// Shows `text` now and restores the resting label after `FEEDBACK_DURATION`.
    pub fn flash(&self, text: &str) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Self::set_label(&self.label, text);

        let label = self.label.clone();
        let latest = self.generation.clone();
        let resting = self.resting.clone();
        tokio::spawn(async move {
            tokio::time::sleep(FEEDBACK_DURATION).await;
            if latest.load(Ordering::SeqCst) == generation {
                Self::set_label(&label, &resting);
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    FetchFailed,
    ClipboardFailed,
}

#[derive(Clone)]
pub struct CopyHelper {
    api: Arc<dyn DocsApi>,
    clipboard: Arc<dyn Clipboard>,
}

impl CopyHelper {
    pub fn new(api: Arc<dyn DocsApi>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self { api, clipboard }
    }

    /// Fetches the requested text and puts it on the clipboard. The trigger
    /// acknowledges the click whatever happens; failures are only logged.
    pub async fn copy(&self, kind: CopyKind, name: &str, trigger: &CopyTrigger) -> CopyOutcome {
        info!("Copying {} for {}", kind, name);
        let outcome = match self.api.fetch_copy_content(kind, name).await {
            Ok(payload) => {
                let content = payload.into_content(name);
                match self.clipboard.write_text(&content).await {
                    Ok(()) => CopyOutcome::Copied(content),
                    Err(e) => {
                        error!("Could not copy text: {}", e);
                        CopyOutcome::ClipboardFailed
                    }
                }
            }
            Err(e) => {
                error!("Error fetching {} for {}: {}", kind, name, e);
                CopyOutcome::FetchFailed
            }
        };
        trigger.flash(ACK_LABEL);
        outcome
    }
}

/// Copies the raw text of a rendered code block; the button shows `Copied!`
/// or `Error`.
pub async fn copy_code_block(
    clipboard: &dyn Clipboard,
    block: &CodeBlock,
    button: &CopyTrigger
) -> bool {
    match clipboard.write_text(&block.code).await {
        Ok(()) => {
            button.flash(ACK_LABEL);
            true
        }
        Err(e) => {
            error!("Failed to copy: {}", e);
            button.flash(ERROR_LABEL);
            false
        }
    }
}
