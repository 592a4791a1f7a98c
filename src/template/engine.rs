//! Template Engine
//!
//! Applies a named formatting profile to document text:
//! 1. Frontmatter injection (`structure.frontmatter`)
//! 2. Table of contents (`structure.toc`)
//! 3. Heading style normalization and emoji policy
//! 4. Code fence, admonition and table passes
//!
//! Output is stable under re-application: a frontmatter block and a
//! generated TOC block already present in the input are replaced.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;

use tracing::{debug, info};

use super::definition::{FormattingFlags, HeadingStyle, TemplateDefinition};
use super::registry::{SharedTemplateRegistry, TemplateRegistry};
use crate::analyzer::StructureAnalysis;
use crate::analyzer::emoji::{normalize, strip_leading_emoji};
use crate::analyzer::extractor::{
    FenceTracker, LeadingFrontmatter, is_paragraph_line, leading_frontmatter, parse_heading_line,
    setext_level,
};
use crate::constants::template::{FRONTMATTER_FENCE, TOC_END, TOC_HEADING, TOC_START};
use crate::navigation::slug::AnchorSet;
use crate::types::metadata::is_blank;
use crate::types::{Diagnostic, DiagnosticKind, Metadata, Result};

const DEFAULT_TITLE: &str = "Documentation";
const RESERVED_KEYS: [&str; 3] = ["title", "description", "template"];

static CALLOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}>\s*\[!([A-Za-z]+)\][ \t]*(.*)$").unwrap());

#[derive(Debug, Clone)]
pub struct TemplateEngine {
    registry: SharedTemplateRegistry,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(TemplateRegistry::builtin().into_shared())
    }
}

impl TemplateEngine {
    pub fn new(registry: SharedTemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Format `content` with the named template.
    ///
    /// Fails with `TemplateNotFound` when the name is not registered; callers
    /// choose their own fallback.
    pub fn apply(&self, content: &str, template: &str, metadata: &Metadata) -> Result<String> {
        let definition = self.registry.get(template)?;
        info!("Applying template '{}'", template);
        render(content, definition, metadata)
    }

    /// Required sections of the named template missing from an analyzed document
    pub fn check_sections(
        &self,
        template: &str,
        analysis: &StructureAnalysis,
    ) -> Result<Vec<Diagnostic>> {
        Ok(check_sections(self.registry.get(template)?, analysis))
    }
}

/// Format `content` with an already resolved template
pub fn render(content: &str, template: &TemplateDefinition, metadata: &Metadata) -> Result<String> {
    let (frontmatter, body) = split_frontmatter(content);
    let body = strip_toc(body);

    let formatted = format_body(body, &template.formatting);
    debug!(
        "Formatted body: {} headings, {} lines",
        formatted.headings.len(),
        formatted.lines.len()
    );

    let mut out = String::with_capacity(content.len() + 256);
    if template.structure.frontmatter {
        let mut merged = metadata.clone();
        if let Some(existing) = &frontmatter {
            merged.merge_missing(&existing.values);
        }
        let first_label = formatted
            .headings
            .first()
            .map(|(_, text)| strip_leading_emoji(text).trim())
            .filter(|label| !label.is_empty());
        out.push_str(&frontmatter_block(template, &merged, first_label)?);
        out.push('\n');
    } else if let Some(existing) = &frontmatter {
        out.push_str(&existing.raw);
        out.push('\n');
    }

    if template.structure.toc && !formatted.headings.is_empty() {
        out.push_str(&toc_block(&formatted.headings));
        out.push('\n');
    }

    if !formatted.lines.is_empty() {
        out.push_str(&formatted.lines.join("\n"));
        out.push('\n');
    }
    Ok(out)
}

// =============================================================================
// Frontmatter
// =============================================================================

struct Frontmatter {
    /// Block text including both fences, newline terminated
    raw: String,
    values: Metadata,
}

/// Split a leading `---` block from the body; a block that is not a YAML
/// mapping is left in the body
fn split_frontmatter(content: &str) -> (Option<Frontmatter>, &str) {
    let Some(LeadingFrontmatter { mapping, end }) = leading_frontmatter(content) else {
        return (None, content);
    };
    let values = mapping
        .into_iter()
        .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v)))
        .collect();
    let mut raw = content[..end].to_string();
    if !raw.ends_with('\n') {
        raw.push('\n');
    }
    (Some(Frontmatter { raw, values }), &content[end..])
}

fn frontmatter_block(
    template: &TemplateDefinition,
    metadata: &Metadata,
    first_label: Option<&str>,
) -> Result<String> {
    let mut mapping = Mapping::new();

    let title = metadata
        .get("title")
        .filter(|v| !is_blank(v))
        .cloned()
        .unwrap_or_else(|| Value::String(first_label.unwrap_or(DEFAULT_TITLE).to_string()));
    mapping.insert(Value::String("title".to_string()), title);

    if let Some(description) = metadata.get("description").filter(|v| !is_blank(v)) {
        mapping.insert(Value::String("description".to_string()), description.clone());
    }
    mapping.insert(
        Value::String("template".to_string()),
        Value::String(template.display_name.clone()),
    );

    for (key, value) in metadata.iter() {
        if RESERVED_KEYS.contains(&key.as_str()) || is_blank(value) {
            continue;
        }
        mapping.insert(Value::String(key.clone()), value.clone());
    }

    let yaml = serde_yaml::to_string(&Value::Mapping(mapping))?;
    Ok(format!("{fence}\n{yaml}{fence}\n", fence = FRONTMATTER_FENCE))
}

// =============================================================================
// Table of Contents
// =============================================================================

/// Drop a previously generated TOC block at the top of the body
fn strip_toc(body: &str) -> &str {
    let trimmed = body.trim_start_matches(['\n', '\r']);
    let Some(first) = trimmed.lines().next() else {
        return trimmed;
    };
    if first.trim() != TOC_START {
        return trimmed;
    }

    let mut offset = 0;
    for line in trimmed.split_inclusive('\n') {
        offset += line.len();
        if line.trim() == TOC_END {
            return trimmed[offset..].trim_start_matches(['\n', '\r']);
        }
    }
    trimmed
}

fn toc_block(headings: &[(u8, String)]) -> String {
    let base = headings.iter().map(|(level, _)| *level).min().unwrap_or(1);
    let mut anchors = AnchorSet::new();
    anchors.unique(TOC_HEADING.trim_start_matches('#').trim());

    let mut lines = vec![TOC_START.to_string(), TOC_HEADING.to_string(), String::new()];
    for (level, text) in headings {
        let indent = "  ".repeat(usize::from(level - base));
        lines.push(format!("{}- [{}](#{})", indent, text, anchors.unique(text)));
    }
    lines.push(TOC_END.to_string());

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

// =============================================================================
// Body Formatting
// =============================================================================

struct FormattedBody {
    lines: Vec<String>,
    /// Headings as emitted, in document order
    headings: Vec<(u8, String)>,
}

struct BodyFormatter<'f> {
    flags: &'f FormattingFlags,
    lines: Vec<String>,
    headings: Vec<(u8, String)>,
}

fn format_body(body: &str, flags: &FormattingFlags) -> FormattedBody {
    let source: Vec<&str> = body.trim_end().lines().collect();
    let mut formatter = BodyFormatter {
        flags,
        lines: Vec::with_capacity(source.len()),
        headings: Vec::new(),
    };
    let mut fences = FenceTracker::default();
    let mut i = 0;

    while i < source.len() {
        let line = source[i];

        if fences.observe(line) {
            formatter.lines.push(line.to_string());
            i += 1;
            continue;
        }

        if let Some((level, text)) = parse_heading_line(line) {
            formatter.heading(level, text);
            i += 1;
            continue;
        }

        if let Some(level) = source.get(i + 1).and_then(|next| setext_level(next))
            && is_paragraph_line(line)
            && (i == 0 || source[i - 1].trim().is_empty())
        {
            formatter.heading(level, line.trim());
            i += 2;
            continue;
        }

        if flags.admonitions
            && let Some(caps) = CALLOUT_RE.captures(line)
        {
            i = formatter.admonition(&caps[1], caps[2].trim(), &source, i + 1);
            continue;
        }

        if flags.tables && is_table_delimiter(line) {
            formatter.separate_table();
        }

        formatter.lines.push(line.to_string());
        i += 1;
    }

    if flags.code_blocks
        && let Some(fence) = fences.unclosed()
    {
        debug!("Closing unterminated code fence");
        formatter.lines.push(fence.closing_line());
    }

    FormattedBody {
        lines: formatter.lines,
        headings: formatter.headings,
    }
}

impl BodyFormatter<'_> {
    fn heading(&mut self, level: u8, text: &str) {
        let text = if self.flags.emojis {
            text
        } else {
            match strip_leading_emoji(text).trim() {
                "" => text,
                stripped => stripped,
            }
        };

        let setext = self.flags.heading_style == HeadingStyle::Setext
            && level <= 2
            && is_paragraph_line(text);
        if setext {
            if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
                self.lines.push(String::new());
            }
            let underline = if level == 1 { "=" } else { "-" };
            self.lines.push(text.to_string());
            self.lines
                .push(underline.repeat(text.chars().count().max(3)));
        } else {
            self.lines
                .push(format!("{} {}", "#".repeat(usize::from(level)), text));
        }
        self.headings.push((level, text.to_string()));
    }

    /// Convert a `> [!KIND]` callout starting before `start`; returns the next line index
    fn admonition(&mut self, kind: &str, title: &str, source: &[&str], start: usize) -> usize {
        let kind = admonition_kind(kind);
        if title.is_empty() {
            self.lines.push(format!("!!! {}", kind));
        } else {
            self.lines.push(format!("!!! {} \"{}\"", kind, title));
        }

        let mut i = start;
        while let Some(line) = source.get(i) {
            let Some(quoted) = line.trim_start().strip_prefix('>') else {
                break;
            };
            let content = quoted.strip_prefix(' ').unwrap_or(quoted);
            if content.trim().is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("    {}", content));
            }
            i += 1;
        }

        if source.get(i).is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
        i
    }

    /// Ensure a blank line before the header row that was just emitted
    fn separate_table(&mut self) {
        let n = self.lines.len();
        if n >= 2 && self.lines[n - 1].contains('|') && !self.lines[n - 2].trim().is_empty() {
            self.lines.insert(n - 1, String::new());
        }
    }
}

fn admonition_kind(kind: &str) -> String {
    match kind.to_ascii_uppercase().as_str() {
        "NOTE" => "note".to_string(),
        "TIP" => "tip".to_string(),
        "IMPORTANT" => "info".to_string(),
        "WARNING" => "warning".to_string(),
        "CAUTION" => "danger".to_string(),
        _ => kind.to_ascii_lowercase(),
    }
}

fn is_table_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

// =============================================================================
// Required Sections
// =============================================================================

/// Report required template sections absent from the document.
///
/// A heading satisfies a requirement when it has the same level and matches
/// by label, by leading emoji, or by classified category name. Missing
/// sections have no source line and are reported at line 0.
pub fn check_sections(
    template: &TemplateDefinition,
    analysis: &StructureAnalysis,
) -> Vec<Diagnostic> {
    template
        .required_sections()
        .filter(|section| {
            let wanted_emoji = section.emoji.as_deref().map(normalize);
            !analysis.headings.iter().any(|heading| {
                if heading.level != section.level {
                    return false;
                }
                let label = strip_leading_emoji(&heading.text).trim();
                label.eq_ignore_ascii_case(&section.title)
                    || heading
                        .category
                        .display_name()
                        .eq_ignore_ascii_case(&section.title)
                    || matches!(
                        (&wanted_emoji, &heading.emoji),
                        (Some(want), Some(have)) if *want == normalize(have)
                    )
            })
        })
        .map(|section| {
            Diagnostic::new(
                DiagnosticKind::MissingSection,
                0,
                section.title.clone(),
                format!(
                    "Template '{}' requires a level-{} '{}' section",
                    template.name, section.level, section.title
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin;
    use crate::template::definition::SectionRequirement;
    use crate::types::WeaveError;

    fn engine() -> TemplateEngine {
        TemplateEngine::default()
    }

    const DOC: &str = "# 🏠 Home\nWelcome.\n## 📚 About\nText\n## About\n";

    #[test]
    fn test_unknown_template_fails() {
        let err = engine()
            .apply(DOC, "nonexistent_template", &Metadata::new())
            .unwrap_err();
        match err {
            WeaveError::TemplateNotFound { name, available } => {
                assert_eq!(name, "nonexistent_template");
                assert!(available.contains(&"standard_docs".to_string()));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_standard_frontmatter_and_toc() {
        let metadata = Metadata::new()
            .with("author", "Docs Circle")
            .with("description", "")
            .with("tags", Value::Sequence(vec![]));
        let out = engine().apply(DOC, "standard_docs", &metadata).unwrap();

        let expected = "\
---
title: Home
template: Standard Documentation
author: Docs Circle
---

<!-- toc -->
## Table of Contents

- [🏠 Home](#home)
  - [📚 About](#about)
  - [About](#about_1)
<!-- /toc -->

# 🏠 Home
Welcome.
## 📚 About
Text
## About
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_toc_anchors_keep_unicode_letters() {
        let out = engine()
            .apply("# Über uns\n## 팀 소개\n", "standard_docs", &Metadata::new())
            .unwrap();
        assert!(out.contains("- [Über uns](#über-uns)\n"));
        assert!(out.contains("  - [팀 소개](#팀-소개)\n"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let engine = engine();
        let metadata = Metadata::new().with("title", "Ops Guide");
        for name in ["standard_docs", "technical_docs", "project_docs", "minimal"] {
            let once = engine.apply(DOC, name, &metadata).unwrap();
            let twice = engine.apply(&once, name, &metadata).unwrap();
            assert_eq!(once, twice, "template {name} not idempotent");
        }
    }

    #[test]
    fn test_minimal_leaves_content() {
        let out = engine().apply(DOC, "minimal", &Metadata::new()).unwrap();
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_existing_frontmatter_is_replaced() {
        let input = "---\ntitle: Old\nowner: ops\n---\n\n# Home\n";
        let out = engine()
            .apply(input, "standard_docs", &Metadata::new().with("title", "New"))
            .unwrap();
        assert!(out.starts_with(
            "---\ntitle: New\ntemplate: Standard Documentation\nowner: ops\n---\n"
        ));
        assert_eq!(out.matches("---\n").count(), 2);
    }

    #[test]
    fn test_title_defaults() {
        let out = engine()
            .apply("plain text\n", "standard_docs", &Metadata::new())
            .unwrap();
        assert!(out.starts_with("---\ntitle: Documentation\n"));
        assert!(!out.contains(TOC_START));
    }

    #[test]
    fn test_setext_and_emoji_policy() {
        let mut template = builtin::standard_docs();
        template.structure.frontmatter = false;
        template.structure.toc = false;
        template.formatting.heading_style = HeadingStyle::Setext;
        template.formatting.emojis = false;

        let input = "intro\n# 🏠 Home\n## About\n### Deep\n";
        let out = render(input, &template, &Metadata::new()).unwrap();
        assert_eq!(out, "intro\n\nHome\n====\n\nAbout\n-----\n### Deep\n");
        assert_eq!(render(&out, &template, &Metadata::new()).unwrap(), out);
    }

    #[test]
    fn test_setext_input_normalized_to_atx() {
        let template = builtin::minimal();
        let out = render("Title\n=====\n\nPart\n---\n", &template, &Metadata::new()).unwrap();
        assert_eq!(out, "# Title\n\n## Part\n");
    }

    #[test]
    fn test_unterminated_fence_closed() {
        let out = render("# Code\n```rust\nfn main() {}\n", &builtin::minimal(), &Metadata::new())
            .unwrap();
        assert_eq!(out, "# Code\n```rust\nfn main() {}\n```\n");
    }

    #[test]
    fn test_headings_inside_fences_untouched() {
        let mut template = builtin::minimal();
        template.formatting.emojis = false;
        let input = "```\n# 🏠 not a heading\n```\n";
        assert_eq!(render(input, &template, &Metadata::new()).unwrap(), input);
    }

    #[test]
    fn test_admonitions_converted() {
        let input = "# Notes\n> [!WARNING] Careful\n> Do not run this\n>\n> twice\nAfter\n";
        let out = render(input, &builtin::standard_docs(), &Metadata::new()).unwrap();
        assert!(out.contains(
            "!!! warning \"Careful\"\n    Do not run this\n\n    twice\n\nAfter\n"
        ));

        let minimal = render(input, &builtin::minimal(), &Metadata::new()).unwrap();
        assert!(minimal.contains("> [!WARNING]"));
    }

    #[test]
    fn test_table_gets_blank_line() {
        let input = "Intro line\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let out = render(input, &builtin::minimal(), &Metadata::new()).unwrap();
        assert_eq!(out, "Intro line\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
    }

    fn analysis_of(text: &str) -> StructureAnalysis {
        crate::pipeline::DocumentProcessor::default().analyze(text).analysis
    }

    #[test]
    fn test_check_sections() {
        let technical = builtin::technical_docs();
        let analysis = analysis_of("# 📖 Intro\n## Getting Started\n");
        let missing = check_sections(&technical, &analysis);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].kind, DiagnosticKind::MissingSection);
        assert_eq!(missing[0].text, "Getting Started");

        let mut custom = builtin::minimal();
        custom.sections = vec![SectionRequirement::new(1, None, "FAQ", true)];
        assert!(check_sections(&custom, &analysis_of("# ❓ Questions\n")).is_empty());
    }
}
