use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::correction::{CorrectionContext, CorrectionOutcome, RateDeduction, correct};
use crate::errors::AppError;
use crate::file_utils::FileManager;

use super::job::{EventFields, Job};
use super::object_store::{LocalObjectStore, ObjectStore, ObjectUrl, output_object_key};
use super::results::{JsonLinesResultSink, ResultRecord, ResultSink, WebhookResultSink};

// @module: Job runner, read -> correct -> write -> report

// @struct: Completed job
#[derive(Debug, Clone)]
pub struct ProcessedJob {
    // @field: Validated job
    pub job: Job,

    // @field: Written object
    pub output: ObjectUrl,

    // @field: Correction result
    pub outcome: CorrectionOutcome,

    // @field: Caption rate deduction
    pub deduction: RateDeduction,
}

/// Runs queue events through the correction engine
pub struct JobRunner {
    // @field: Caption storage
    store: Arc<dyn ObjectStore>,

    // @field: Result channels, all receive every record
    sinks: Vec<Arc<dyn ResultSink>>,

    // @field: Queue name stamped on records
    queue: String,
}

impl JobRunner {
    pub fn new(store: Arc<dyn ObjectStore>, sinks: Vec<Arc<dyn ResultSink>>, queue: impl Into<String>) -> Self {
        Self {
            store,
            sinks,
            queue: queue.into(),
        }
    }

    /// Build a runner with the storage and result channels named in the config
    pub fn with_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(&config.storage_root));

        let mut sinks: Vec<Arc<dyn ResultSink>> = Vec::new();
        match &config.result_log {
            Some(path) => sinks.push(Arc::new(JsonLinesResultSink::to_file(path))),
            None => sinks.push(Arc::new(JsonLinesResultSink::to_stdout())),
        }
        if let Some(endpoint) = config.webhook_endpoint()? {
            let sink = WebhookResultSink::new(endpoint, config.webhook_timeout_secs)
                .context("Failed to create webhook result sink")?;
            sinks.push(Arc::new(sink));
        }

        Ok(Self::new(store, sinks, config.result_queue.clone()))
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Process one raw event and publish its result record.
    ///
    /// Job failures become failure records; only a failure to publish is an error.
    pub async fn run_event(&self, event_text: &str) -> Result<ResultRecord> {
        let fields = EventFields::from_json(event_text);
        let job_id = fields.as_ref().ok().and_then(|f| f.job_id()).map(str::to_string);

        let record = match fields {
            Ok(fields) => match self.process(&fields).await {
                Ok(done) => ResultRecord::success(
                    &done.job.job_id,
                    done.output.to_string(),
                    done.outcome.applied.clone(),
                    &self.queue,
                ),
                Err(e) => self.failure_record(job_id.as_deref(), &e),
            },
            Err(e) => self.failure_record(None, &AppError::from(e)),
        };

        self.publish(&record).await?;
        Ok(record)
    }

    /// Run a job end to end. Nothing is written unless every step succeeded.
    pub async fn process(&self, fields: &EventFields) -> Result<ProcessedJob, AppError> {
        let job = Job::from_fields(fields)?;
        job.log_summary();

        let source = ObjectUrl::parse(&job.source_url)?;
        let scc_text = self.store.read_text(&source).await?;
        info!("SCC contents successfully loaded.");

        let (context, deduction) = CorrectionContext::deduce(
            &job.scc_starting_timecode,
            &job.video_starting_timecode,
            job.video_frame_rate,
            &scc_text,
        )?;
        info!(
            "SCC frame rate {} (drop frame: {}), video frame rate {} (drop frame: {})",
            context.scc_frame_rate, context.scc_drop_frame, context.video_frame_rate, context.video_drop_frame
        );

        let outcome = correct(source.filename(), &scc_text, &context)?;

        let key = output_object_key(&job.output_url, source.bucket(), &outcome.filename)?;
        let output = ObjectUrl::new(source.bucket(), key);
        self.store.write_text(&output, &outcome.text()).await?;
        info!("Corrected SCC written to {}", output);

        Ok(ProcessedJob {
            job,
            output,
            outcome,
            deduction,
        })
    }

    /// Run every event file under a path: a single file, or all `*.json` in a directory
    pub async fn run_path(&self, path: &Path) -> Result<Vec<ResultRecord>> {
        let events = if FileManager::file_exists(path) {
            vec![path.to_path_buf()]
        } else if FileManager::dir_exists(path) {
            let mut found = FileManager::find_files(path, "json")?;
            found.sort();
            found
        } else {
            return Err(anyhow::anyhow!("Event path does not exist: {:?}", path));
        };

        if events.is_empty() {
            warn!("No event files found in {:?}", path);
            return Ok(Vec::new());
        }

        let progress = progress_bar(events.len() as u64);
        let mut records = Vec::with_capacity(events.len());
        for event_path in &events {
            progress.set_message(display_name(event_path));
            let text = FileManager::read_to_string(event_path)?;
            let record = self.run_event(&text).await?;
            records.push(record);
            progress.inc(1);
        }

        let failed = records.iter().filter(|r| !r.is_success()).count();
        progress.finish_with_message(format!("{} succeeded, {} failed", records.len() - failed, failed));
        Ok(records)
    }

    fn failure_record(&self, job_id: Option<&str>, error: &AppError) -> ResultRecord {
        error!("Error: {}", error);
        ResultRecord::failure(job_id, error, &self.queue)
    }

    async fn publish(&self, record: &ResultRecord) -> Result<()> {
        for sink in &self.sinks {
            sink.publish(record)
                .await
                .with_context(|| format!("Failed to publish result {}", record.message_id))?;
        }
        Ok(())
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} events ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("█▓▒░"));
    progress
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}
