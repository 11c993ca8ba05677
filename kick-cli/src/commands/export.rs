//! Flat CSV exports from a session log.
//!
//! These consume the session-log contract: newline-delimited records
//! discriminated by their `type` field. Output uses a UTF-8 BOM so
//! spreadsheet tools detect the encoding.

use chat_stats::{SessionRecord, SnapshotFields};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AppError, Result};

const BOM: &str = "\u{feff}";

const SNAPSHOT_HEADER: &[&str] = &[
    "timestamp",
    "channel",
    "messages_per_minute",
    "messages_per_second",
    "unique_per_minute",
    "unique_per_second",
    "total_messages",
    "unique_total",
    "viewer_count",
    "screenshot_path",
];

const MESSAGE_HEADER: &[&str] = &["timestamp", "channel", "username", "message"];

/// Export snapshot records to CSV. Default output: input with a `.csv`
/// extension.
pub fn export_snapshots(input: &Path, output: Option<&Path>) -> Result<()> {
    let snapshots: Vec<SnapshotFields> = read_records(input)?
        .into_iter()
        .filter_map(|record| match record {
            SessionRecord::Snapshot(fields) => Some(fields),
            _ => None,
        })
        .collect();

    if snapshots.is_empty() {
        return Err(AppError::Export("No snapshot data found".to_string()));
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("csv"));

    let mut writer = BufWriter::new(File::create(&output)?);
    write!(writer, "{BOM}")?;
    writeln!(writer, "{}", SNAPSHOT_HEADER.join(","))?;
    for snapshot in snapshots {
        let row = [
            snapshot.ts.to_rfc3339(),
            snapshot.channel,
            snapshot.messages_per_minute.to_string(),
            snapshot.messages_per_second.to_string(),
            snapshot.unique_per_minute.to_string(),
            snapshot.unique_per_second.to_string(),
            snapshot.total_messages.to_string(),
            snapshot.unique_total.to_string(),
            snapshot
                .viewer_count
                .map(|count| count.to_string())
                .unwrap_or_default(),
            snapshot.screenshot_path.unwrap_or_default(),
        ];
        writeln!(writer, "{}", row.map(|field| csv_escape(&field)).join(","))?;
    }
    writer.flush()?;

    println!("Wrote {}", output.display());
    Ok(())
}

/// Export message records to CSV. Default output: `<stem>-messages.csv`
/// next to the input.
pub fn export_messages(input: &Path, output: Option<&Path>) -> Result<()> {
    let messages: Vec<(String, String, String, String)> = read_records(input)?
        .into_iter()
        .filter_map(|record| match record {
            SessionRecord::Message {
                ts,
                channel,
                username,
                message,
            } => Some((ts.to_rfc3339(), channel, username, message)),
            _ => None,
        })
        .collect();

    if messages.is_empty() {
        return Err(AppError::Export("No message data found".to_string()));
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_messages_path(input));

    let mut writer = BufWriter::new(File::create(&output)?);
    write!(writer, "{BOM}")?;
    writeln!(writer, "{}", MESSAGE_HEADER.join(","))?;
    for (ts, channel, username, message) in messages {
        writeln!(
            writer,
            "{},{},{},{}",
            csv_escape(&ts),
            csv_escape(&channel),
            csv_escape(&username),
            csv_escape(&message)
        )?;
    }
    writer.flush()?;

    println!("Wrote {}", output.display());
    Ok(())
}

fn default_messages_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".to_string());
    input.with_file_name(format!("{stem}-messages.csv"))
}

/// Read every parseable record from a session log, skipping blank lines
/// and anything that fails to parse.
fn read_records(input: &Path) -> Result<Vec<SessionRecord>> {
    let reader = BufReader::new(File::open(input)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<SessionRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => debug!(error = %e, "skipping unparseable log line"),
        }
    }
    Ok(records)
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn write_log(dir: &Path, records: &[SessionRecord]) -> PathBuf {
        let path = dir.join("session.jsonl");
        let lines: Vec<String> = records
            .iter()
            .map(|record| serde_json::to_string(record).unwrap())
            .collect();
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();
        path
    }

    fn sample_records() -> Vec<SessionRecord> {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        vec![
            SessionRecord::SessionStart {
                ts,
                channel: "somechannel".to_string(),
                chatroom_id: 7,
            },
            SessionRecord::Message {
                ts,
                channel: "somechannel".to_string(),
                username: "viewer1".to_string(),
                message: "hello, \"world\"".to_string(),
            },
            SessionRecord::Snapshot(SnapshotFields {
                ts,
                channel: "somechannel".to_string(),
                messages_per_minute: 4,
                messages_per_second: 1,
                unique_per_minute: 3,
                unique_per_second: 1,
                total_messages: 4,
                unique_total: 3,
                viewer_count: None,
                screenshot_path: Some("shots/frame.jpg".to_string()),
                screenshot_base64: None,
            }),
        ]
    }

    #[test]
    fn test_export_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_log(dir.path(), &sample_records());

        export_snapshots(&input, None).unwrap();

        let output = input.with_extension("csv");
        let contents = std::fs::read_to_string(&output).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap().trim_start_matches('\u{feff}'),
            SNAPSHOT_HEADER.join(",")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("somechannel"));
        // Unknown viewer count exports as an empty field.
        assert!(row.contains(",,"));
        assert!(row.contains("shots/frame.jpg"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_messages_escapes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_log(dir.path(), &sample_records());

        export_messages(&input, None).unwrap();

        let output = dir.path().join("session-messages.csv");
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.contains("\"hello, \"\"world\"\"\""));
    }

    #[test]
    fn test_export_empty_log_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_log(
            dir.path(),
            &[SessionRecord::SessionStart {
                ts: Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap(),
                channel: "somechannel".to_string(),
                chatroom_id: 7,
            }],
        );

        let err = export_snapshots(&input, None).unwrap_err();
        assert!(err.to_string().contains("No snapshot data found"));

        let err = export_messages(&input, None).unwrap_err();
        assert!(err.to_string().contains("No message data found"));
    }

    #[test]
    fn test_read_records_skips_blank_and_junk_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        std::fs::write(
            &path,
            "\n{not json}\n{\"type\":\"message\",\"ts\":\"2024-06-01T20:00:00Z\",\"channel\":\"c\",\"username\":\"u\",\"message\":\"m\"}\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
    }
}
