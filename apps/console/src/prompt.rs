use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use patient_cell::ConfirmPrompt;

/// Line-oriented questions on stdin.
pub struct StdinPrompt {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Trimmed answer; `None` on a blank line or end of input.
    pub async fn ask(&self, question: &str) -> anyhow::Result<Option<String>> {
        print!("{} ", question);
        std::io::stdout().flush()?;

        let line = self.lines.lock().await.next_line().await?;
        Ok(line
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty()))
    }

    pub async fn yes_no(&self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question)).await?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> bool {
        self.yes_no(message).await.unwrap_or(false)
    }
}
