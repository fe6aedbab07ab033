//! The per-file tagging pipeline.
//!
//! Every file is processed on a private temporary copy:
//!
//! 1. copy the source to `<tmp>/<sha256(relative path + timestamp)>.<ext>`
//! 2. open it as a [`Song`], converting first when a target format is set
//! 3. resolve metadata, cover and lyrics
//! 4. if found: write the tags, move the copy into place and optionally
//!    delete the source; otherwise discard the copy
//!
//! Temporary files are owned by [`TempFile`] guards, so dropping the
//! pipeline at any await point (Ctrl-C) leaves the source untouched and
//! nothing behind in the temp directory.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::converter::Converter;
use crate::enrichment::EnrichmentService;
use crate::error::{Error, Result, ResultExt};
use crate::model::Song;
use crate::organizer;
use crate::scanner::ScanPlan;
use crate::temp::TempFile;

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Tagged and placed at the given path
    Tagged(PathBuf),
    /// No catalog match; nothing was written
    NotFound,
}

/// Counters for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tagged: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.tagged + self.not_found + self.failed
    }
}

/// Runs the pipeline over a [`ScanPlan`].
pub struct Processor<'a> {
    config: &'a Config,
    service: EnrichmentService,
    converter: Option<Converter>,
    temp_dir: PathBuf,
}

impl<'a> Processor<'a> {
    /// Build a processor with the real network clients.
    ///
    /// Fails on configuration problems only: an unsupported conversion
    /// format, or an HTTP client that cannot be built.
    pub fn new(config: &'a Config) -> Result<Self> {
        let service = EnrichmentService::new(config)?;
        let converter = Converter::from_config(&config.conversion)?;
        if let Some(converter) = &converter
            && !converter.is_available()
        {
            return Err(Error::config(
                "ffmpeg not found. Install it or set conversion.ffmpeg in the config file",
            ));
        }
        Ok(Self::with_service(config, service, converter))
    }

    /// Build a processor around an existing service (tests inject mocks here)
    pub fn with_service(
        config: &'a Config,
        service: EnrichmentService,
        converter: Option<Converter>,
    ) -> Self {
        Self {
            config,
            service,
            converter,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Use `dir` for temporary copies and downloaded covers
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Process every file of the plan, one at a time.
    ///
    /// A failing file is logged and counted; only configuration errors stop
    /// the run.
    pub async fn run(&self, plan: &ScanPlan) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        if plan.is_empty() {
            tracing::info!(root = %plan.root.display(), "No eligible file found");
            return Ok(summary);
        }

        tracing::info!(root = %plan.root.display(), files = plan.len(), "Processing files");
        for relative in &plan.files {
            tracing::info!(file = %relative.display(), "Processing file");
            match self.process(&plan.root, relative).await {
                Ok(Outcome::Tagged(path)) => {
                    tracing::info!(file = %relative.display(), to = %path.display(), "Complete");
                    summary.tagged += 1;
                }
                Ok(Outcome::NotFound) => {
                    tracing::info!(file = %relative.display(), "No match, file left unchanged");
                    summary.not_found += 1;
                }
                Err(e) if e.is_fatal_for_run() => return Err(e),
                Err(e) => {
                    tracing::error!(file = %relative.display(), error = %e, "Processing failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            tagged = summary.tagged,
            not_found = summary.not_found,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    /// Process one file, given relative to `root`.
    pub async fn process(&self, root: &Path, relative: &Path) -> Result<Outcome> {
        let source = root.join(relative);
        let working = self.copy_to_temp(&source, relative)?;

        let mut song = Song::open(working.path(), &source)?;
        let working = match &self.converter {
            Some(converter) => self.convert(converter, &mut song, working).await?,
            None => working,
        };

        let resolution = self
            .service
            .resolve_all(&mut song, Some(&self.temp_dir))
            .await;
        if !resolution.found {
            return Ok(Outcome::NotFound);
        }

        song.save(self.config.tagging.watermark())
            .with_context(format!("writing tags of {}", relative.display()))?;
        let placed = organizer::place(&self.config.output, root, relative, &song)?;
        working.release();

        if self.config.output.remove_original && placed != source {
            if let Err(e) = std::fs::remove_file(&source) {
                tracing::debug!(path = %source.display(), error = %e, "Could not remove original");
            }
        }
        Ok(Outcome::Tagged(placed))
    }

    /// Copy the source into a uniquely named temporary file.
    fn copy_to_temp(&self, source: &Path, relative: &Path) -> Result<TempFile> {
        if !source.is_file() {
            return Err(Error::not_found(source));
        }
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let file = TempFile::new(
            self.temp_dir
                .join(format!("{}.{extension}", temp_name(relative))),
        );

        std::fs::copy(source, file.path())
            .with_context(format!("copying {} to a temporary file", source.display()))?;
        Ok(file)
    }

    /// Convert the working copy, swapping the guard over to the new file.
    async fn convert(
        &self,
        converter: &Converter,
        song: &mut Song,
        working: TempFile,
    ) -> Result<TempFile> {
        if converter.is_noop_for(working.path()) {
            return Ok(working);
        }

        // Owned before ffmpeg starts writing it
        let converted = TempFile::new(converter.output_path(working.path()));

        let job = converter.clone();
        let input = working.path().to_path_buf();
        tokio::task::spawn_blocking(move || job.convert(&input))
            .await
            .map_err(|e| Error::conversion(format!("conversion task failed: {e}")))??;
        drop(working);
        song.set_path(converted.path())
            .with_context(format!("reading converted file {}", converted.path().display()))?;
        Ok(converted)
    }
}

/// Hex SHA-256 of the relative path and the current time in nanoseconds.
fn temp_name(relative: &Path) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(relative.to_string_lossy().as_bytes());
    hasher.update(nanos.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}
