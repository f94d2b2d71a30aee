/*!
 * Tests for position-exact rewriting of literals and comments
 */

use plotlingo::app_config::ExtractionConfig;
use plotlingo::extraction;
use plotlingo::rewrite::{self, lexer, RewritePlan};
use plotlingo::translation::TranslationTable;

fn table(entries: &[(&str, &str)]) -> TranslationTable {
    entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Rewrite `source` at the literal sites extraction records for it
fn rewrite_script(source: &str, table: &TranslationTable) -> String {
    let fragments = extraction::extract(source, &ExtractionConfig::default()).expect("script should parse");
    rewrite::rewrite(source, fragments.literal_sites(), table)
}

#[test]
fn test_rewrite_withSineScript_shouldReplaceTitleAndComment() {
    let source = "# Plot the data\nplt.title(\"Sine Wave\")\n";
    let rewritten = rewrite_script(source, &table(&[("Sine Wave", "正弦波"), ("Plot the data", "绘制数据")]));

    assert_eq!(rewritten, "# 绘制数据\nplt.title(\"正弦波\")\n");
}

#[test]
fn test_rewrite_withIdentityTable_shouldBeByteIdentical() {
    let source = "x = 'a'  # trailing\r\n# note\r\nplt.title('a')\r\n";
    assert_eq!(rewrite_script(source, &table(&[("a", "a"), ("note", "note")])), source);
    assert_eq!(rewrite_script(source, &TranslationTable::new()), source);
}

#[test]
fn test_rewrite_withOverlappingKeys_shouldOnlyReplaceWholeLiterals() {
    let source = "ax.set_title('Subplot')\nax.set_xlabel('Plot')\n";
    let rewritten = rewrite_script(source, &table(&[("Plot", "图"), ("Subplot", "子图")]));

    assert_eq!(rewritten, "ax.set_title('子图')\nax.set_xlabel('图')\n");
}

#[test]
fn test_rewrite_withSubstringInsideCode_shouldLeaveIdentifiersAlone() {
    let source = "Plot = 1\nplt.title('Plot')\nprint(Plot)\n";
    let rewritten = rewrite_script(source, &table(&[("Plot", "图")]));

    assert_eq!(rewritten, "Plot = 1\nplt.title('图')\nprint(Plot)\n");
}

#[test]
fn test_rewrite_withQuoteInReplacement_shouldEscapeForDelimiter() {
    let source = "plt.title('Results')\nplt.xlabel(\"Time\")\n";
    let rewritten = rewrite_script(source, &table(&[("Results", "Bob's results"), ("Time", "the \"time\"")]));

    assert_eq!(rewritten, "plt.title('Bob\\'s results')\nplt.xlabel(\"the \\\"time\\\"\")\n");
}

#[test]
fn test_rewrite_withNewlineInReplacement_shouldKeepLiteralOnOneLine() {
    let source = "plt.title('Two lines')\n# Two lines\n";
    let rewritten = rewrite_script(source, &table(&[("Two lines", "第一行\n第二行")]));

    assert_eq!(rewritten, "plt.title('第一行\\n第二行')\n# 第一行 第二行\n");
}

#[test]
fn test_rewrite_withTripleQuotedLiteral_shouldKeepRealNewlines() {
    let source = "plt.title(\"\"\"Long title\"\"\")\n";
    let rewritten = rewrite_script(source, &table(&[("Long title", "很长的\n标题")]));

    assert_eq!(rewritten, "plt.title(\"\"\"很长的\n标题\"\"\")\n");
}

#[test]
fn test_rewrite_withFStringAndBytes_shouldSkipThem() {
    let source = "plt.title(f'Label')\nplt.xlabel(b'Label')\nplt.ylabel('Label')\n";
    let rewritten = rewrite_script(source, &table(&[("Label", "标签")]));

    assert_eq!(rewritten, "plt.title(f'Label')\nplt.xlabel(b'Label')\nplt.ylabel('标签')\n");
}

#[test]
fn test_rewrite_withRawLiteralNeedingEscape_shouldKeepOriginal() {
    let source = "plt.title(r'Angle')\n";
    let rewritten = rewrite_script(source, &table(&[("Angle", "it's an angle")]));
    assert_eq!(rewritten, source);

    let rewritten = rewrite_script(source, &table(&[("Angle", "角度")]));
    assert_eq!(rewritten, "plt.title(r'角度')\n");
}

#[test]
fn test_rewrite_withCommentNotStartingWithKey_shouldNotTouchIt() {
    let source = "# Compute the mean\n# mean value here\n";
    let rewritten = rewrite_script(source, &table(&[("mean value here", "这里是均值"), ("Compute the mean", "计算均值")]));

    assert_eq!(rewritten, "# 计算均值\n# 这里是均值\n");

    let rewritten = rewrite_script("# the mean value here\n", &table(&[("mean value here", "均值")]));
    assert_eq!(rewritten, "# the mean value here\n");
}

#[test]
fn test_rewrite_withCrlfSource_shouldPreserveLineEndings() {
    let source = "# Plot the data\r\nplt.title('Sine Wave')\r\n";
    let rewritten = rewrite_script(source, &table(&[("Sine Wave", "正弦波"), ("Plot the data", "绘制数据")]));

    assert_eq!(rewritten, "# 绘制数据\r\nplt.title('正弦波')\r\n");
}

#[test]
fn test_rewritePlan_shouldOrderLongestFirstAndDropIdentity() {
    let plan = RewritePlan::new(&table(&[("ab", "x"), ("same", "same"), ("abcd", "y"), ("cd", "z")]));
    let keys: Vec<&str> = plan.iter().map(|(k, _)| k).collect();

    assert_eq!(keys, vec!["abcd", "ab", "cd"]);
    assert_eq!(plan.len(), 3);
}

#[test]
fn test_stringLiterals_withCommentContainingQuotes_shouldIgnoreThem() {
    let source = "# it's 'quoted'\nx = \"real\"\n";
    let literals: Vec<String> = lexer::string_literals(source)
        .map(|t| source[t.content.clone()].to_string())
        .collect();

    assert_eq!(literals, vec!["real"]);
}

#[test]
fn test_rewrite_withCommentStartingWithKey_shouldReplaceOnlyInComment() {
    let source = "# Plot title here\nPlot = make_plot()\n";
    let rewritten = rewrite_script(source, &table(&[("Plot", "图")]));

    assert_eq!(rewritten, "# 图 title here\nPlot = make_plot()\n");
}

#[test]
fn test_rewrite_withLabelAlsoUsedAsProtectedKeyword_shouldKeepKeywordValue() {
    let source = "plt.text(0.5, 0.5, \"center\")\nplt.title(\"T\", loc=\"center\")\n";
    let rewritten = rewrite_script(source, &table(&[("center", "中心"), ("T", "标题")]));

    assert_eq!(rewritten, "plt.text(0.5, 0.5, \"中心\")\nplt.title(\"标题\", loc=\"center\")\n");
}

#[test]
fn test_rewrite_withCommentMatchingDictKey_shouldOnlyChangeComment() {
    let source = "# Temperature\ny = df['Temperature']\n";
    let rewritten = rewrite_script(source, &table(&[("Temperature", "温度")]));

    assert_eq!(rewritten, "# 温度\ny = df['Temperature']\n");
}

#[test]
fn test_rewrite_withLiteralOutsideTargetCalls_shouldLeaveIt() {
    let source = "plt.title('Loss')\nhistory = {'Loss': []}\nprint('Loss')\n";
    let rewritten = rewrite_script(source, &table(&[("Loss", "损失")]));

    assert_eq!(rewritten, "plt.title('损失')\nhistory = {'Loss': []}\nprint('Loss')\n");
}
