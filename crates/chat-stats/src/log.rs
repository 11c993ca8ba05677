//! Append-only JSONL session log writer.
//!
//! One record per line, flushed immediately after every write so a crash
//! never loses acknowledged records. Single writer; no deletion, no
//! rewrite.

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::records::SessionRecord;

/// Append-only writer for the session log.
pub struct SessionLogWriter {
    path: PathBuf,
    file: File,
}

impl SessionLogWriter {
    /// Create the log file, truncating any existing file at `path`.
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line and flush it.
    pub async fn write_record(&mut self, record: &SessionRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SnapshotFields;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_every_line_is_a_tagged_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();

        let mut writer = SessionLogWriter::create(&path).await.unwrap();
        writer
            .write_record(&SessionRecord::SessionStart {
                ts,
                channel: "somechannel".to_string(),
                chatroom_id: 7,
            })
            .await
            .unwrap();
        writer
            .write_record(&SessionRecord::Message {
                ts,
                channel: "somechannel".to_string(),
                username: "viewer1".to_string(),
                message: "hi".to_string(),
            })
            .await
            .unwrap();
        writer
            .write_record(&SessionRecord::Snapshot(SnapshotFields {
                ts,
                channel: "somechannel".to_string(),
                messages_per_minute: 1,
                messages_per_second: 1,
                unique_per_minute: 1,
                unique_per_second: 1,
                total_messages: 1,
                unique_total: 1,
                viewer_count: Some(123),
                screenshot_path: None,
                screenshot_base64: None,
            }))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);

        let types: Vec<String> = lines
            .iter()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(types, vec!["session_start", "message", "snapshot"]);

        // Each line parses back into a typed record.
        for line in lines {
            let _: SessionRecord = serde_json::from_str(line).unwrap();
        }
    }

    #[tokio::test]
    async fn test_records_are_flushed_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();

        let mut writer = SessionLogWriter::create(&path).await.unwrap();
        writer
            .write_record(&SessionRecord::Message {
                ts,
                channel: "somechannel".to_string(),
                username: "viewer1".to_string(),
                message: "hi".to_string(),
            })
            .await
            .unwrap();

        // Visible on disk without dropping the writer.
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
