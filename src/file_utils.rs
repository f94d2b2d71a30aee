use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Sibling path `<stem><suffix><ext>` for a processed script
    pub fn output_path<P: AsRef<Path>>(input_file: P, suffix: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let extension = input_file.extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Self::sibling_path(input_file, suffix, &extension)
    }

    // @generates: Sibling path `<stem><suffix><extension>`; extension includes its dot
    pub fn sibling_path<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = format!("{}{}{}", stem, suffix, extension);

        match input_file.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Whether a file is itself the output of an earlier run
    pub fn is_generated_output<P: AsRef<Path>>(path: P, suffix: &str) -> bool {
        path.as_ref().file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
    }

    /// Find files with a specific extension in a directory, sorted by path
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a path is a Python script, a directory of scripts, or something else
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }
        if path.is_dir() {
            return Ok(FileType::Directory);
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            if ext_str == "py" || ext_str == "pyw" {
                return Ok(FileType::PythonScript);
            }
        }

        // Extensionless scripts announce themselves with a shebang
        if let Ok(content) = fs::read_to_string(path) {
            let first_line = content.lines().next().unwrap_or_default();
            if first_line.starts_with("#!") && first_line.contains("python") {
                return Ok(FileType::PythonScript);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different input kinds
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Python source file
    PythonScript,
    /// Directory to search for scripts
    Directory,
    /// Unknown file type
    Unknown,
}
