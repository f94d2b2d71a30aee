/*!
 * End-to-end tests of the per-file translation pipeline
 */

use anyhow::Result;
use std::fs;

use plotlingo::errors::PipelineError;
use plotlingo::injection::{InjectionOutcome, PATCH_MARKER};
use plotlingo::pipeline::{FileOutcome, Pipeline, PipelineOptions, SourceDocument};
use plotlingo::providers::mock::MockProvider;
use plotlingo::translation::TranslationService;

use crate::common;

const SINE_EXPECTED: &str = r#"import numpy as np
import matplotlib.pyplot as plt
# --- CJK font support ---
plt.rcParams['font.sans-serif'] = ['SimHei']
plt.rcParams['axes.unicode_minus'] = False
# ------------------------

# 绘制数据
x = np.linspace(0, 10, 100)
plt.plot(x, np.sin(x))
plt.title("正弦波")
plt.show()
"#;

fn pipeline(service: TranslationService, beautify: bool) -> Pipeline<TranslationService> {
    let mut options = PipelineOptions::from(&common::test_config());
    options.output.beautify = beautify;
    Pipeline::new(service, options)
}

#[tokio::test]
async fn test_processFile_withSineScript_shouldWriteTranslatedRevision() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "sine.py", common::SINE_SCRIPT)?;
    let (service, mock) = common::mock_service([r#"{"Sine Wave": "正弦波", "Plot the data": "绘制数据"}"#]);

    let outcome = pipeline(service, false).process_file(&input).await?;

    let output_path = temp_dir.path().join("sine_zh_revision.py");
    assert_eq!(
        outcome,
        FileOutcome::Saved {
            output_path: output_path.clone(),
            fragments: 2,
            translated: 2,
            injection: InjectionOutcome::Inserted { after_line: 1 },
            beautified: false,
        }
    );
    assert_eq!(fs::read_to_string(&output_path)?, SINE_EXPECTED);
    assert_eq!(fs::read_to_string(&input)?, common::SINE_SCRIPT, "input must never change");
    assert_eq!(mock.request_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_transform_withAxesScript_shouldKeepStylingArguments() -> Result<()> {
    let (service, _) = common::mock_service([r#"{
        "Time (s)": "时间 (s)",
        "Voltage": "电压",
        "Voltage over time": "电压随时间变化",
        "Draw the measurements": "绘制测量值",
        "left": "左"
    }"#]);
    let document = SourceDocument::new("axes.py", common::AXES_SCRIPT);

    let transformed = pipeline(service, false).transform(&document).await?.unwrap();

    assert!(transformed.text.contains("ax.set_xlabel('时间 (s)')"));
    assert!(transformed.text.contains("ax.set_ylabel(\"电压\")"));
    assert!(transformed.text.contains("ax.set_title(\"电压随时间变化\", loc=\"left\")"));
    assert!(transformed.text.contains("# 绘制测量值"));
    assert!(transformed.text.contains("label='Measured'"));
    assert_eq!(transformed.text.matches(PATCH_MARKER).count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_processFile_withNoFragments_shouldNotCallCollaboratorOrWrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bare.py", common::BARE_SCRIPT)?;
    let mock = MockProvider::failing();
    let service = TranslationService::with_mock(Default::default(), "Simplified Chinese", mock.clone());

    let outcome = pipeline(service, false).process_file(&input).await?;

    assert_eq!(outcome, FileOutcome::NothingToDo);
    assert_eq!(mock.request_count(), 0);
    assert!(!temp_dir.path().join("bare_zh_revision.py").exists());
    Ok(())
}

#[tokio::test]
async fn test_processFile_withUnavailableTranslation_shouldWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "sine.py", common::SINE_SCRIPT)?;
    let (service, _) = common::mock_service(["Sorry, I can only answer in prose."]);

    let result = pipeline(service, false).process_file(&input).await;

    assert!(matches!(result, Err(PipelineError::TranslationUnavailable { .. })));
    assert!(!temp_dir.path().join("sine_zh_revision.py").exists());
    Ok(())
}

#[tokio::test]
async fn test_processFile_withSyntaxError_shouldFailBeforeTranslating() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "broken.py", "plt.title('x'\nfor in:\n")?;
    let (service, mock) = common::mock_service(["{}"]);

    let result = pipeline(service, false).process_file(&input).await;

    assert!(matches!(result, Err(PipelineError::Parse { .. })));
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_processFile_withMissingInput_shouldReportIo() {
    let (service, _) = common::mock_service(["{}"]);
    let result = pipeline(service, false).process_file(std::path::Path::new("/no/such/plot.py")).await;
    assert!(matches!(result, Err(PipelineError::Io { .. })));
}

#[tokio::test]
async fn test_transform_withAlreadyPatchedInput_shouldNotInjectAgain() -> Result<()> {
    let (service, _) = common::mock_service([r#"{"Sine Wave": "正弦波", "Plot the data": "绘制数据"}"#]);
    let document = SourceDocument::new("sine.py", SINE_EXPECTED.replace("正弦波", "Sine Wave"));

    let transformed = pipeline(service, false).transform(&document).await?.unwrap();

    assert_eq!(transformed.injection, InjectionOutcome::AlreadyPatched);
    assert_eq!(transformed.text, SINE_EXPECTED);
    Ok(())
}

#[tokio::test]
async fn test_transform_withBeautify_shouldUseFencedRewrite() -> Result<()> {
    let beautified = "import matplotlib.pyplot as plt\nplt.rcParams['font.sans-serif'] = ['SimHei']\nplt.style.use('seaborn-v0_8-paper')\nplt.title('标题')\nplt.show()";
    let (service, mock) = common::mock_service([
        r#"{"Title": "标题"}"#.to_string(),
        format!("Here is the improved script:\n```python\n{}\n```", beautified),
    ]);
    let document = SourceDocument::new("t.py", "import matplotlib.pyplot as plt\nplt.title('Title')\nplt.show()\n");

    let transformed = pipeline(service, true).transform(&document).await?.unwrap();

    assert!(transformed.beautified);
    assert_eq!(transformed.text, format!("{}\n", beautified));
    assert_eq!(mock.request_count(), 2);
    assert!(mock.requests()[1].prompt.contains("plt.title('标题')"));
    Ok(())
}

#[tokio::test]
async fn test_transform_withCrlfScript_shouldKeepCrlfEverywhere() -> Result<()> {
    let (service, _) = common::mock_service([r#"{"Sine Wave": "正弦波"}"#]);
    let document = SourceDocument::new("crlf.py", "import matplotlib.pyplot as plt\r\nplt.title('Sine Wave')\r\n");

    let transformed = pipeline(service, false).transform(&document).await?.unwrap();

    assert!(transformed.text.contains("plt.title('正弦波')\r\n"));
    assert!(!transformed.text.replace("\r\n", "").contains('\n'));
    Ok(())
}

#[tokio::test]
async fn test_processFile_withSharedTitleAndComment_shouldTranslateBothOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = "import matplotlib.pyplot as plt\n\nfig, ax = plt.subplots()\n# Sine Wave\nax.set_title(\"Sine Wave\")\n";
    let input = common::create_test_file(temp_dir.path(), "shared.py", source)?;
    let (service, mock) = common::mock_service([r#"{"Sine Wave": "正弦波"}"#]);

    pipeline(service, false).process_file(&input).await?;

    let output = fs::read_to_string(temp_dir.path().join("shared_zh_revision.py"))?;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "import matplotlib.pyplot as plt");
    assert_eq!(lines[2], "plt.rcParams['font.sans-serif'] = ['SimHei']");
    assert!(output.contains("ax.set_title(\"正弦波\")"));
    assert!(output.contains("# 正弦波\n"));
    assert_eq!(output.matches(PATCH_MARKER).count(), 1);
    assert_eq!(mock.requests()[0].prompt.matches("\"Sine Wave\"").count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_transform_withKeywordValueMatchingLabel_shouldKeepScriptRunnable() -> Result<()> {
    let (service, _) = common::mock_service([r#"{"center": "中心", "T": "标题"}"#]);
    let document = SourceDocument::new(
        "center.py",
        "import matplotlib.pyplot as plt\nplt.text(0.5, 0.5, \"center\")\nplt.title(\"T\", loc=\"center\")\n",
    );

    let transformed = pipeline(service, false).transform(&document).await?.unwrap();

    assert!(transformed.text.contains("plt.text(0.5, 0.5, \"中心\")"));
    assert!(transformed.text.contains("plt.title(\"标题\", loc=\"center\")"));
    Ok(())
}

#[tokio::test]
async fn test_processFile_withBareScriptAndFailedBeautify_shouldSaveFontBlock() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "bare.py", common::BARE_SCRIPT)?;
    let service = TranslationService::with_mock(Default::default(), "Simplified Chinese", MockProvider::failing());

    let outcome = pipeline(service, true).process_file(&input).await?;

    let output_path = temp_dir.path().join("bare_zh_revision.py");
    assert_eq!(
        outcome,
        FileOutcome::Saved {
            output_path: output_path.clone(),
            fragments: 0,
            translated: 0,
            injection: InjectionOutcome::Inserted { after_line: 0 },
            beautified: false,
        }
    );
    let output = fs::read_to_string(&output_path)?;
    assert_eq!(output.matches(PATCH_MARKER).count(), 1);
    assert!(output.ends_with("plt.show()\n"));
    Ok(())
}

#[tokio::test]
async fn test_processFile_withTranslatedComments_shouldNotResendThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = "import matplotlib.pyplot as plt\n# 绘制数据\nplt.plot([1, 2], [3, 4])\nplt.show()\n";
    let input = common::create_test_file(temp_dir.path(), "partial.py", source)?;
    let mock = MockProvider::failing();
    let service = TranslationService::with_mock(Default::default(), "Simplified Chinese", mock.clone());

    let outcome = pipeline(service, false).process_file(&input).await?;

    assert_eq!(outcome, FileOutcome::NothingToDo);
    assert_eq!(mock.request_count(), 0);
    Ok(())
}
