use async_trait::async_trait;
use log::{ debug, info };
use std::process::Stdio;
use std::sync::{ Arc, Mutex };
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::cli::Args;
use crate::error::{ ClientError, Result };

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Keeps everything written to it; the last entry is the clipboard content.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    history: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }

    pub fn writes(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        self.history
            .lock()
            .map_err(|_| ClientError::Clipboard("clipboard lock poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Pipes text into an external command such as `pbcopy` or `xclip -selection clipboard`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| ClientError::Clipboard("empty clipboard command".to_string()))?;
        Ok(Self { program, args: parts.collect() })
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        debug!("Writing {} bytes to clipboard via {}", text.len(), self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ClientError::Clipboard(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// Used when no clipboard command is configured: the text goes to stdout.
#[derive(Debug, Default, Clone)]
pub struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(text.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

pub fn create_clipboard(args: &Args) -> Result<Arc<dyn Clipboard>> {
    match args.clipboard_command.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(command) => {
            info!("Clipboard command: {}", command);
            Ok(Arc::new(CommandClipboard::parse(command)?))
        }
        None => {
            info!("No clipboard command configured, copied text goes to stdout");
            Ok(Arc::new(StdoutClipboard))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_clipboard_keeps_last_write() {
        let clipboard = MemoryClipboard::new();
        clipboard.write_text("a").await.unwrap();
        clipboard.write_text("b").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("b"));
        assert_eq!(clipboard.writes(), 2);
    }

    #[test]
    fn parses_command_lines() {
        let cmd = CommandClipboard::parse("xclip -selection clipboard").unwrap();
        assert_eq!(cmd.program, "xclip");
        assert_eq!(cmd.args, vec!["-selection".to_string(), "clipboard".to_string()]);
        assert!(CommandClipboard::parse("   ").is_err());
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let cmd = CommandClipboard::parse("definitely-not-a-real-clipboard-tool").unwrap();
        assert!(cmd.write_text("x").await.is_err());
    }
}
