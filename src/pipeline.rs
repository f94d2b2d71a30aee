/*!
 * Per-file orchestration: read, extract, translate, rewrite, inject,
 * optionally beautify, write.
 *
 * Every stage produces new text; the input file is never modified and
 * nothing is written unless the run reaches `Saved`.
 */

use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, ExtractionConfig, InjectionConfig, OutputConfig};
use crate::errors::PipelineError;
use crate::extraction::{self, FragmentSet};
use crate::file_utils::FileManager;
use crate::injection::{self, InjectionOutcome};
use crate::rewrite;
use crate::translation::response::strip_code_fence;
use crate::translation::{reconcile, TextCollaborator, TranslationTable};

/// Original file text, never mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { path: path.into(), text: text.into() }
    }

    /// Read a document from disk
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = FileManager::read_to_string(path).map_err(|e| PipelineError::Io {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line view, split on `\n` so `\r` stays with its line
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Stages a file goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Loaded,
    Extracted,
    Translated,
    TranslationSkipped,
    Rewritten,
    Injected,
    Beautified,
    AsIs,
    Saved,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loaded => "loaded",
            Self::Extracted => "extracted",
            Self::Translated => "translated",
            Self::TranslationSkipped => "translation skipped",
            Self::Rewritten => "rewritten",
            Self::Injected => "injected",
            Self::Beautified => "beautified",
            Self::AsIs => "kept as is",
            Self::Saved => "saved",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written
    Saved {
        output_path: PathBuf,
        /// Unique fragments found
        fragments: usize,
        /// Fragments whose replacement differs from the original
        translated: usize,
        injection: InjectionOutcome,
        beautified: bool,
    },
    /// Nothing worth writing
    NothingToDo,
}

/// Final text of a file plus what was done to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub fragments: usize,
    pub translated: usize,
    pub injection: InjectionOutcome,
    pub beautified: bool,
}

/// Settings the pipeline needs from the application configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub extraction: ExtractionConfig,
    pub injection: InjectionConfig,
    pub output: OutputConfig,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            extraction: config.extraction.clone(),
            injection: config.injection.clone(),
            output: config.output.clone(),
        }
    }
}

/// Callback told about every stage a file enters
pub type StageObserver = Arc<dyn Fn(&Path, PipelineStage) + Send + Sync>;

/// Sequential per-file pipeline over a text collaborator
pub struct Pipeline<C: TextCollaborator> {
    collaborator: C,
    options: PipelineOptions,
    observer: Option<StageObserver>,
}

impl<C: TextCollaborator> Pipeline<C> {
    pub fn new(collaborator: C, options: PipelineOptions) -> Self {
        Self { collaborator, options, observer: None }
    }

    /// Report stage transitions to `observer` as well as the log
    pub fn with_observer(mut self, observer: StageObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn enter(&self, path: &Path, stage: PipelineStage) {
        debug!("{}: {}", path.display(), stage);
        if let Some(observer) = &self.observer {
            observer(path, stage);
        }
    }

    /// Where the output for `input` goes
    pub fn output_path(&self, input: &Path) -> PathBuf {
        FileManager::output_path(input, &self.options.output.suffix)
    }

    /// Process one file and write `<stem><suffix><ext>` next to it
    pub async fn process_file(&self, path: &Path) -> Result<FileOutcome, PipelineError> {
        let result = self.process_file_inner(path).await;
        if result.is_err() {
            self.enter(path, PipelineStage::Failed);
        }
        result
    }

    async fn process_file_inner(&self, path: &Path) -> Result<FileOutcome, PipelineError> {
        let document = SourceDocument::load(path)?;
        self.enter(path, PipelineStage::Loaded);

        let Some(transformed) = self.transform(&document).await? else {
            info!("Nothing to do for {}", path.display());
            return Ok(FileOutcome::NothingToDo);
        };

        let output_path = self.output_path(path);
        FileManager::write_to_file(&output_path, &transformed.text).map_err(|e| PipelineError::Io {
            path: output_path.clone(),
            message: format!("{:#}", e),
        })?;
        self.enter(path, PipelineStage::Saved);
        info!("Saved {}", output_path.display());

        Ok(FileOutcome::Saved {
            output_path,
            fragments: transformed.fragments,
            translated: transformed.translated,
            injection: transformed.injection,
            beautified: transformed.beautified,
        })
    }

    /// Run every text stage on a document without touching the filesystem
    ///
    /// `None` means there is nothing worth saving.
    pub async fn transform(&self, document: &SourceDocument) -> Result<Option<Transformed>, PipelineError> {
        let path = document.path();
        if document.text().trim().is_empty() {
            return Err(PipelineError::EmptyInput(path.to_path_buf()));
        }

        let fragments = extraction::extract(document.text(), &self.options.extraction)
            .map_err(|source| PipelineError::Parse { path: path.to_path_buf(), source })?;
        self.enter(path, PipelineStage::Extracted);
        debug!("{} unique fragments in {}", fragments.len(), path.display());

        if fragments.is_empty() && !self.options.output.beautify {
            self.enter(path, PipelineStage::TranslationSkipped);
            return Ok(None);
        }

        let table = self.translate(path, &fragments).await?;
        let rewritten = rewrite::rewrite(document.text(), fragments.literal_sites(), &table);
        self.enter(path, PipelineStage::Rewritten);

        let (injected, injection) = injection::inject_text(&rewritten, &self.options.injection);
        self.enter(path, PipelineStage::Injected);

        let mut beautified = false;
        let text = if self.options.output.beautify {
            match self.beautify(path, &injected).await {
                Some(text) => {
                    beautified = true;
                    self.enter(path, PipelineStage::Beautified);
                    text
                }
                None if fragments.is_empty() && !injection.changed_text() => {
                    warn!("Beautify failed for {} and there is nothing else to save", path.display());
                    return Ok(None);
                }
                None => {
                    self.enter(path, PipelineStage::AsIs);
                    injected
                }
            }
        } else {
            self.enter(path, PipelineStage::AsIs);
            injected
        };

        Ok(Some(Transformed {
            text,
            fragments: fragments.len(),
            translated: table.changed_count(),
            injection,
            beautified,
        }))
    }

    async fn translate(&self, path: &Path, fragments: &FragmentSet) -> Result<TranslationTable, PipelineError> {
        if fragments.is_empty() {
            self.enter(path, PipelineStage::TranslationSkipped);
            return Ok(TranslationTable::new());
        }

        let table = reconcile(fragments, &self.collaborator).await
            .map_err(|source| PipelineError::TranslationUnavailable { path: path.to_path_buf(), source })?;
        self.enter(path, PipelineStage::Translated);
        Ok(table)
    }

    /// Whole-file rewrite; `None` keeps the current text
    async fn beautify(&self, path: &Path, text: &str) -> Option<String> {
        let reply = match self.collaborator.rewrite_whole(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Beautify failed for {}: {}", path.display(), e);
                return None;
            }
        };

        let code = strip_code_fence(&reply);
        if code.trim().is_empty() {
            warn!("Beautify returned no code for {}", path.display());
            return None;
        }
        if self.options.output.verify_rewrites && !extraction::is_valid_python(code) {
            warn!("Beautified code for {} does not parse, keeping the translated version", path.display());
            return None;
        }

        let mut code = code.to_string();
        if text.ends_with('\n') && !code.ends_with('\n') {
            code.push('\n');
        }
        Some(code)
    }
}
