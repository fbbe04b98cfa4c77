// Storage module - appends store events to a JSON Lines activity journal
//
// One JSON object per line, so the journal can be grepped or piped to jq:
//   jq 'select(.type == "ActionRecorded")' logs/petmatch-20251127-143022-a7b3.jsonl
//
// Each server run gets its own file. The journal is write-only: nothing reads
// it back on startup.

use crate::events::StoreEvent;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Writes events to a per-run JSONL file
pub struct Journal {
    log_dir: PathBuf,
    session_id: String,
    event_rx: mpsc::Receiver<StoreEvent>,
}

impl Journal {
    /// Create the journal, making sure `log_dir` exists
    pub fn new(
        log_dir: PathBuf,
        session_id: String,
        event_rx: mpsc::Receiver<StoreEvent>,
    ) -> Result<Self> {
        fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

        Ok(Self {
            log_dir,
            session_id,
            event_rx,
        })
    }

    /// Format: petmatch-YYYYMMDD-HHMMSS-XXXX.jsonl
    pub fn file_path(&self) -> PathBuf {
        self.log_dir
            .join(format!("petmatch-{}.jsonl", self.session_id))
    }

    /// Drain the channel until every sender is dropped
    pub async fn run(mut self) -> Result<()> {
        tracing::info!("Journal started: {:?}", self.file_path());

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.append(&event) {
                tracing::error!("Failed to journal {}: {:?}", event.kind(), e);
            }
        }

        tracing::info!("Journal shutting down");
        Ok(())
    }

    fn append(&self, event: &StoreEvent) -> Result<()> {
        let path = self.file_path();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open journal file")?;

        let json = serde_json::to_string(event).context("Failed to serialize event")?;
        writeln!(file, "{}", json).context("Failed to write to journal file")?;

        // Flush per line so the file is readable while the server runs
        file.flush().context("Failed to flush journal file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_journal_writes_one_line_per_event() {
        let dir = std::env::temp_dir().join(format!(
            "petmatch-journal-test-{}",
            crate::events::generate_session_id()
        ));
        let (tx, rx) = mpsc::channel(8);
        let journal = Journal::new(dir.clone(), "test".to_string(), rx).unwrap();
        let path = journal.file_path();

        tx.send(StoreEvent::AnimalRemoved {
            timestamp: Utc::now(),
            animal_id: 3,
            removed_by: 1,
        })
        .await
        .unwrap();
        tx.send(StoreEvent::MatchApproved {
            timestamp: Utc::now(),
            match_id: 1,
            approved_by: 1,
        })
        .await
        .unwrap();
        drop(tx);

        journal.run().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: StoreEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.kind(), "AnimalRemoved");

        let _ = std::fs::remove_dir_all(dir);
    }
}
