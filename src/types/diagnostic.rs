use serde::{Deserialize, Serialize};

/// Non-fatal finding collected while analyzing a document.
///
/// Every diagnostic carries the line and literal text of the offending
/// heading so the source document can be corrected directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// 1-based source line
    pub line: usize,
    /// Literal text of the offending line or heading
    pub text: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        line: usize,
        text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    pub fn malformed_heading(line: usize, text: impl Into<String>, reason: &str) -> Self {
        Self::new(
            DiagnosticKind::MalformedHeading,
            line,
            text,
            format!("Malformed heading: {}", reason),
        )
    }

    pub fn hierarchy_gap(line: usize, text: impl Into<String>, from: u8, to: u8) -> Self {
        Self::new(
            DiagnosticKind::HierarchyGap,
            line,
            text,
            format!(
                "Heading level jumps from {} to {}; attached to nearest enclosing heading",
                from, to
            ),
        )
    }

    pub fn slug_collision(
        line: usize,
        text: impl Into<String>,
        slug: &str,
        resolved: &str,
    ) -> Self {
        Self::new(
            DiagnosticKind::SlugCollision,
            line,
            text,
            format!("Slug '{}' already taken, using '{}'", slug, resolved),
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Marker count outside 1-6 or marker without text
    MalformedHeading,
    /// Level jumps more than one deeper than the nearest open ancestor
    HierarchyGap,
    /// Two entries wanted the same path; resolved with a numeric suffix
    SlugCollision,
    /// In-document link whose anchor matches no heading
    UnresolvedReference,
    /// Template requires a section the document does not have
    MissingSection,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::SlugCollision => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeading => write!(f, "MalformedHeading"),
            Self::HierarchyGap => write!(f, "HierarchyGap"),
            Self::SlugCollision => write!(f, "SlugCollision"),
            Self::UnresolvedReference => write!(f, "UnresolvedReference"),
            Self::MissingSection => write!(f, "MissingSection"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Count diagnostics of one kind
pub fn count_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_severity() {
        assert_eq!(
            DiagnosticKind::SlugCollision.default_severity(),
            Severity::Info
        );
        assert_eq!(
            DiagnosticKind::HierarchyGap.default_severity(),
            Severity::Warning
        );
        assert!(Severity::Error < Severity::Warning);
    }

    #[test]
    fn test_diagnostic_serializes_snake_case() {
        let diag = Diagnostic::hierarchy_gap(2, "### Skipped", 1, 3);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "hierarchy_gap");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["line"], 2);
    }
}
