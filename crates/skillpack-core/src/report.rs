use serde::Serialize;

/// How severe a single validation finding is.
///
/// `Error` blocks packaging; `Warning` is advisory and never affects
/// the exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation result. Findings never reference each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Ordered collection of findings for one validation run, partitioned
/// by severity for reporting. Aggregation cannot fail.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    #[must_use]
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// All findings in discovery order.
    #[must_use]
    pub fn all(&self) -> &[Finding] {
        &self.findings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Fatal findings, preserving discovery order.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    /// Advisory findings, preserving discovery order.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// True when no fatal finding exists. Warnings never block.
    #[must_use]
    pub fn passes(&self) -> bool {
        self.errors().next().is_none()
    }
}
