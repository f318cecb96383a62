//! Append-only lead log: one CSV file, header written once, rows only ever
//! appended.

use anyhow::Context;
use catalog_types::lead::LeadRecord;
use std::io::Write;
use std::path::{Path, PathBuf};

const HEADER: &str = "ts,ip,lead_type,page,referer,utm_json,fields_json\n";

#[derive(Clone)]
pub struct LeadSink {
    dir: PathBuf,
}

impl LeadSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn csv_path(&self) -> PathBuf {
        self.dir.join("leads.csv")
    }

    pub async fn append(&self, record: LeadRecord) -> Result<(), anyhow::Error> {
        let path = self.csv_path();
        tokio::task::spawn_blocking(move || append_record(&path, &record))
            .await
            .context("lead append task failed")?
    }

    /// Raw CSV content for the admin export, header included even when no
    /// leads were captured yet.
    pub async fn export(&self) -> Result<String, anyhow::Error> {
        let path = self.csv_path();
        tokio::task::spawn_blocking(move || {
            ensure_header(&path)?;
            std::fs::read_to_string(&path)
                .with_context(|| format!("Unable to read {}", path.display()))
        })
        .await
        .context("lead export task failed")?
    }
}

fn ensure_header(path: &Path) -> Result<(), anyhow::Error> {
    let dir = path
        .parent()
        .with_context(|| format!("No parent dir for {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create dir {}", dir.display()))?;
    if !path.exists() {
        std::fs::write(path, HEADER)
            .with_context(|| format!("Unable to create {}", path.display()))?;
    }
    Ok(())
}

fn append_record(path: &Path, record: &LeadRecord) -> Result<(), anyhow::Error> {
    ensure_header(path)?;
    let file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer
        .serialize(record)
        .context("Unable to write lead row")?;
    writer.flush().context("Unable to flush lead row")?;
    writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("{err}"))?
        .flush()
        .context("Unable to flush leads file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::lead::LeadRequest;
    use tempfile::TempDir;

    fn record(lead_type: &str) -> LeadRecord {
        LeadRecord::from_request(
            LeadRequest {
                lead_type: lead_type.to_string(),
                page: "/catalog/kmu/".into(),
                ..LeadRequest::default()
            },
            "10.0.0.1".into(),
        )
    }

    #[tokio::test]
    async fn export_of_empty_log_is_header_only() {
        let dir = TempDir::new().unwrap();
        let sink = LeadSink::new(dir.path().join("leads"));
        assert_eq!(sink.export().await.unwrap(), HEADER);
    }

    #[tokio::test]
    async fn appends_accumulate() {
        let dir = TempDir::new().unwrap();
        let sink = LeadSink::new(dir.path().join("leads"));
        sink.append(record("price")).await.unwrap();
        sink.append(record("callback")).await.unwrap();

        let content = sink.export().await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("price"));
        assert!(lines[2].contains("callback"));
        assert!(lines[2].contains("10.0.0.1"));
    }
}
