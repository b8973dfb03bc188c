use crate::detail::ClipboardService;
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};

/// Clipboard writer that shells out to the platform's copy tool
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let candidates = if cfg!(target_os = "macos") {
            vec![("pbcopy", vec![])]
        } else if cfg!(target_os = "windows") {
            vec![("clip", vec![])]
        } else {
            vec![
                ("wl-copy", vec![]),
                ("xclip", vec!["-selection", "clipboard"]),
                ("xsel", vec!["--clipboard", "--input"]),
            ]
        };
        Self { candidates }
    }
}

impl SystemClipboard {
    fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<()> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {program}"))?;

        child
            .stdin
            .take()
            .context("Clipboard tool has no stdin")?
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {program}"))?;

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("{program} exited with {status}"))
        }
    }
}

impl ClipboardService for SystemClipboard {
    fn set(&mut self, text: &str) -> Result<()> {
        let mut last_error = anyhow!("No clipboard tool available");
        for (program, args) in &self.candidates {
            match Self::pipe_to(program, args, text) {
                Ok(()) => {
                    tracing::debug!(program, bytes = text.len(), "clipboard set");
                    return Ok(());
                }
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }
}
