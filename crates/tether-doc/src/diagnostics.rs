//! Warnings raised while rewriting documentation.
//!
//! Documentation problems never stop generation; they are reported to a
//! [`WarningSink`] and processing continues with the best text available.

use std::fmt;

use crate::modification::DocModification;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver for diagnostics. Fire-and-forget.
pub trait WarningSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn warn(&mut self, message: String) {
        self.report(Diagnostic::warning(message));
    }
}

impl WarningSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Prints each diagnostic to stderr as it arrives.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl WarningSink for StderrSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        eprintln!("{diagnostic}");
    }
}

const CODE_PREVIEW: usize = 20;

/// Message for an XPath rewrite that failed or changed nothing.
///
/// Each rule is shown as its XPath and the start of its replacement code
/// with whitespace collapsed.
pub fn modification_error(rules: &[&DocModification], what: &str) -> String {
    let rules: Vec<String> = rules
        .iter()
        .map(|rule| format!("(\"{}\" -> \"{}\")", rule.xpath(), code_preview(rule.code())))
        .collect();
    format!(
        "Error when applying modifications {}: {what}",
        rules.join(", ")
    )
}

fn code_preview(code: &str) -> String {
    let simplified = code.split_whitespace().collect::<Vec<_>>().join(" ");
    if simplified.chars().count() > CODE_PREVIEW {
        let head: String = simplified.chars().take(CODE_PREVIEW).collect();
        format!("{}...", head.trim_end())
    } else {
        simplified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.warn("first".to_string());
        sink.report(Diagnostic {
            severity: Severity::Error,
            message: "second".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].to_string(), "warning: first");
        assert_eq!(sink[1].to_string(), "error: second");
    }

    #[test]
    fn message_lists_rules_with_code_preview() {
        let short = DocModification::xpath_replace("//brief", "<para>\n  Hi\n</para>");
        let long = DocModification::xpath_replace(
            "//para[@id=\"x\"]",
            "<para>a rather long replacement paragraph</para>",
        );
        let message = modification_error(&[&short, &long], "boom");
        assert_eq!(
            message,
            "Error when applying modifications (\"//brief\" -> \"<para> Hi </para>\"), \
             (\"//para[@id=\"x\"]\" -> \"<para>a rather long...\"): boom"
        );
    }
}
