/*!
 * Common test utilities for the sccfix test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use sccfix::adapter::{LocalObjectStore, ResultRecord, ResultSink};
use sccfix::errors::ResultChannelError;

/// Route library logs through env_logger in test mode
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds SCC text: header, then one caption per timecode, blank-line separated
pub fn scc_text(timecodes: &[&str]) -> String {
    let mut text = String::from("Scenarist_SCC V1.0\n");
    for timecode in timecodes {
        text.push('\n');
        text.push_str(timecode);
        text.push_str("\t9420 9420 94ae 94ae 9452 9452 97a1 97a1\n");
    }
    text
}

/// Caption timecodes of SCC text, in file order
pub fn timecodes_of(text: &str) -> Vec<String> {
    sccfix::caption_document::scan_timecodes(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Queue event with the six required fields
pub fn event_json(job_id: &str, source: &str, output: &str, scc_start: &str, video_start: &str, rate: &str) -> String {
    serde_json::json!({
        "Records": [{
            "body": {
                "field": [
                    {"key": "vs_job_id", "value": job_id},
                    {"key": "s3_url", "value": source},
                    {"key": "output_s3_url", "value": output},
                    {"key": "mi_text_time_code_first_frame", "value": scc_start},
                    {"key": "mi_time_code_first_frame", "value": video_start},
                    {"key": "mi_time_code_frame_rate", "value": rate}
                ]
            }
        }]
    })
    .to_string()
}

/// Store rooted in a fresh temp dir with one object seeded at `bucket/key`
pub fn seeded_store(bucket: &str, key: &str, content: &str) -> Result<(TempDir, LocalObjectStore)> {
    let dir = create_temp_dir()?;
    create_test_file(&dir.path().join(bucket), key, content)?;
    let store = LocalObjectStore::new(dir.path());
    Ok((dir, store))
}

/// Result sink that keeps records in memory
#[derive(Default, Clone)]
pub struct CollectingSink {
    records: Arc<Mutex<Vec<ResultRecord>>>,
}

impl CollectingSink {
    pub fn records(&self) -> Vec<ResultRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ResultSink for CollectingSink {
    async fn publish(&self, record: &ResultRecord) -> Result<(), ResultChannelError> {
        self.records
            .lock()
            .map_err(|e| ResultChannelError::Delivery(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}
