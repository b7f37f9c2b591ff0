//! The external query and transform engines.
//!
//! The documentation pipeline never interprets XPath or XSLT itself; it
//! builds program text and hands it to an [`XslTransform`]. [`XsltProc`]
//! drives the system `xsltproc` tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{DocError, Result};

/// Applies an XSLT program to an XML document.
pub trait XslTransform {
    /// Transform `xml` with `program`, a sequence of top-level template
    /// declarations (without the enclosing `xsl:stylesheet`).
    fn transform(&self, xml: &str, program: &str) -> Result<String>;
}

/// Evaluates a query against the documentation source.
pub trait XQuery {
    fn evaluate(&self, query: &str) -> Result<String>;
}

const STYLESHEET_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsl:stylesheet version="1.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
<xsl:output method="xml" omit-xml-declaration="yes"/>
"#;

const STYLESHEET_CLOSE: &str = "</xsl:stylesheet>\n";

/// [`XslTransform`] backed by the `xsltproc` command line tool.
#[derive(Debug, Clone)]
pub struct XsltProc {
    program: PathBuf,
}

impl Default for XsltProc {
    fn default() -> Self {
        Self::new()
    }
}

impl XsltProc {
    /// Use `xsltproc` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("xsltproc")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// First line of the tool's version banner, or `None` if it cannot be run.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.program).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        // xsltproc prints its banner on stdout; some builds use stderr.
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Some(
            String::from_utf8_lossy(&banner)
                .lines()
                .next()
                .unwrap_or("(unknown version)")
                .to_string(),
        )
    }

    pub fn is_available(&self) -> bool {
        self.version().is_some()
    }

    /// Wrap template declarations in a complete stylesheet.
    pub fn stylesheet(program: &str) -> String {
        format!("{STYLESHEET_OPEN}{program}{STYLESHEET_CLOSE}")
    }
}

impl XslTransform for XsltProc {
    fn transform(&self, xml: &str, program: &str) -> Result<String> {
        let mut stylesheet = tempfile::Builder::new().suffix(".xsl").tempfile()?;
        stylesheet.write_all(Self::stylesheet(program).as_bytes())?;
        stylesheet.flush()?;
        let mut input = tempfile::Builder::new().suffix(".xml").tempfile()?;
        input.write_all(xml.as_bytes())?;
        input.flush()?;

        let output = Command::new(&self.program)
            .arg("--nonet")
            .arg(stylesheet.path())
            .arg(input.path())
            .output()
            .map_err(|e| DocError::Transform {
                detail: format!("failed to invoke {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocError::Transform {
                detail: stderr.trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(strip_xml_declaration(&text).trim_end().to_string())
    }
}

fn strip_xml_declaration(text: &str) -> &str {
    match text.strip_prefix("<?xml") {
        Some(rest) => rest
            .split_once("?>")
            .map_or(text, |(_, body)| body.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_is_stripped() {
        assert_eq!(
            strip_xml_declaration("<?xml version=\"1.0\"?>\n<a/>\n"),
            "<a/>\n"
        );
        assert_eq!(strip_xml_declaration("<a/>"), "<a/>");
        assert_eq!(strip_xml_declaration("<?xml broken"), "<?xml broken");
    }

    #[test]
    fn stylesheet_wraps_program() {
        let sheet = XsltProc::stylesheet("<xsl:template match=\"/\"/>\n");
        assert!(sheet.starts_with("<?xml"));
        assert!(sheet.contains("xmlns:xsl=\"http://www.w3.org/1999/XSL/Transform\""));
        assert!(sheet.contains("<xsl:template match=\"/\"/>\n</xsl:stylesheet>"));
    }

    #[test]
    fn missing_tool_is_a_transform_error() {
        let engine = XsltProc::with_program("/nonexistent/xsltproc");
        assert!(!engine.is_available());
        let err = engine.transform("<a/>", "").unwrap_err();
        assert!(matches!(err, DocError::Transform { .. }));
        assert!(err.to_string().contains("failed to invoke"));
    }
}
