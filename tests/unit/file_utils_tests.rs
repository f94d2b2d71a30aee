/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use plotlingo::file_utils::{FileManager, FileType};

use crate::common;

#[test]
fn test_outputPath_withNestedInput_shouldStaySibling() {
    assert_eq!(
        FileManager::output_path("/data/plots/sine.py", "_zh_revision"),
        PathBuf::from("/data/plots/sine_zh_revision.py")
    );
    assert_eq!(FileManager::output_path("fit", "_zh_revision"), PathBuf::from("fit_zh_revision"));
}

#[test]
fn test_siblingPath_shouldReplaceExtension() {
    assert_eq!(
        FileManager::sibling_path("scripts/fit.py", "_analysis", ".md"),
        PathBuf::from("scripts/fit_analysis.md")
    );
}

#[test]
fn test_findFiles_withMixedFiles_shouldReturnSortedScripts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("nested"))?;

    common::create_test_file(root, "b.py", "x = 1\n")?;
    common::create_test_file(root, "a.PY", "x = 1\n")?;
    common::create_test_file(root, "notes.txt", "ignored")?;
    common::create_test_file(&root.join("nested"), "c.py", "x = 1\n")?;

    let files = FileManager::find_files(root, ".py")?;
    let names: Vec<String> = files.iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.PY", "b.py", "nested/c.py"]);
    Ok(())
}

#[test]
fn test_writeToFile_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("deep").join("plot.py");

    FileManager::write_to_file(&target, "print('hi')\n")?;

    assert_eq!(FileManager::read_to_string(&target)?, "print('hi')\n");
    Ok(())
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/definitely/not/here.py").is_err());
}

#[test]
fn test_detectFileType_shouldRecognizeScriptsAndDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let script = common::create_test_file(root, "plot.py", "import matplotlib\n")?;
    let shebang = common::create_test_file(root, "runner", "#!/usr/bin/env python3\nprint(1)\n")?;
    let other = common::create_test_file(root, "data.csv", "1,2\n")?;

    assert_eq!(FileManager::detect_file_type(&script)?, FileType::PythonScript);
    assert_eq!(FileManager::detect_file_type(&shebang)?, FileType::PythonScript);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert_eq!(FileManager::detect_file_type(root)?, FileType::Directory);
    assert!(FileManager::detect_file_type(root.join("missing.py")).is_err());
    Ok(())
}

#[test]
fn test_isGeneratedOutput_withCustomSuffix_shouldMatchStemOnly() {
    assert!(FileManager::is_generated_output("plot_fr.py", "_fr"));
    assert!(!FileManager::is_generated_output("plot_fr/data.py", "_fr"));
}
