use anyhow::{Result, Context, anyhow};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{error, warn, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::analysis;
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::pipeline::{FileOutcome, Pipeline, PipelineOptions, PipelineStage};
use crate::translation::prompts::ReportSection;
use crate::translation::{TextCollaborator, TranslationService};

// @module: Application controller for script processing

/// Counts of what happened to the files of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Output written
    pub processed: usize,
    /// Output already existed
    pub skipped: usize,
    /// No fragments and nothing else to save
    pub unchanged: usize,
    /// Failed files
    pub errors: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} unchanged, {} errors",
            self.processed, self.skipped, self.unchanged, self.errors
        )
    }
}

/// Main application controller for script translation
pub struct Controller<C: TextCollaborator = TranslationService> {
    // @field: App configuration
    config: Config,
    // @field: Per-file pipeline
    pipeline: Pipeline<C>,
    // @field: Status line, hidden until a run starts
    status: ProgressBar,
}

impl Controller<TranslationService> {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let language = language_utils::prompt_language_name(&config.target_language)?;
        let service = TranslationService::new(config.translation.clone(), language)
            .context("Failed to create translation service")?;
        Ok(Self::with_collaborator(config, service))
    }
}

impl<C: TextCollaborator> Controller<C> {
    // @method: Create a controller over an existing collaborator
    pub fn with_collaborator(config: Config, collaborator: C) -> Self {
        let status = ProgressBar::hidden();
        let observer_status = status.clone();
        let observer = Arc::new(move |path: &Path, stage: PipelineStage| {
            observer_status.set_message(format!("{}: {}", display_name(path), stage));
        });

        let pipeline = Pipeline::new(collaborator, PipelineOptions::from(&config)).with_observer(observer);
        Self { config, pipeline, status }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collaborator(&self) -> &C {
        self.pipeline.collaborator()
    }

    /// Translate one script
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if FileManager::detect_file_type(&input_file)? != FileType::PythonScript {
            warn!("{} does not look like a Python script, processing anyway", input_file.display());
        }

        self.start_status(None);
        let mut summary = RunSummary::default();
        let result = self.process_one(&input_file, force_overwrite, &mut summary).await;
        self.status.finish_and_clear();
        result?;

        info!("Done in {}: {}", format_duration(start_time.elapsed()), summary);
        Ok(summary)
    }

    /// Run the workflow in folder mode, processing all Python scripts below a directory
    /// Files that are outputs of an earlier run, or already have one, are skipped
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<RunSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let suffix = &self.config.output.suffix;
        let scripts: Vec<PathBuf> = FileManager::find_files(&input_dir, "py")?
            .into_iter()
            .filter(|p| !FileManager::is_generated_output(p, suffix))
            .collect();

        if scripts.is_empty() {
            return Err(anyhow!("No Python scripts found in directory: {:?}", input_dir));
        }
        info!("Found {} scripts in {}", scripts.len(), input_dir.display());

        self.start_status(Some(scripts.len() as u64));
        let mut summary = RunSummary::default();

        for script in &scripts {
            if let Err(e) = self.process_one(script, force_overwrite, &mut summary).await {
                error!("Error processing file {}: {:#}", display_name(script), e);
                summary.errors += 1;
            }
            self.status.inc(1);
        }

        self.status.finish_and_clear();
        info!(
            "Folder processing completed in {}: {}",
            format_duration(start_time.elapsed()),
            summary
        );
        Ok(summary)
    }

    async fn process_one(&self, script: &Path, force_overwrite: bool, summary: &mut RunSummary) -> Result<()> {
        let output_path = self.pipeline.output_path(script);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, {} already exists (use -f to force overwrite)",
                display_name(script),
                display_name(&output_path)
            );
            summary.skipped += 1;
            return Ok(());
        }

        match self.pipeline.process_file(script).await? {
            FileOutcome::Saved { output_path, fragments, translated, injection, beautified } => {
                info!(
                    "Success: {} ({} fragments, {} translated, injection {:?}{})",
                    output_path.display(),
                    fragments,
                    translated,
                    injection,
                    if beautified { ", beautified" } else { "" }
                );
                summary.processed += 1;
            }
            FileOutcome::NothingToDo => summary.unchanged += 1,
        }
        Ok(())
    }

    /// Write an analysis report for one script
    pub async fn analyze(&self, input_file: PathBuf, sections: &[ReportSection]) -> Result<PathBuf> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        analysis::analyze(&input_file, sections, self.collaborator()).await
    }

    /// Rename the variables of one script per a naming standard
    pub async fn rename(&self, input_file: PathBuf, standards: PathBuf) -> Result<PathBuf> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::file_exists(&standards) {
            return Err(anyhow!("Naming standards file does not exist: {:?}", standards));
        }
        analysis::rename_variables(&input_file, &standards, self.collaborator()).await
    }

    fn start_status(&self, files: Option<u64>) {
        let style = match files {
            Some(_) => ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            None => ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        };
        self.status.set_style(style);
        self.status.set_length(files.unwrap_or(0));
        self.status.set_position(0);
        self.status.set_draw_target(ProgressDrawTarget::stderr());
        self.status.enable_steady_tick(Duration::from_millis(120));
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// Format duration in a human-readable format
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
