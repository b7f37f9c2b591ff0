//! Documentation modification rules.
//!
//! A [`DocModification`] is an immutable configuration item attached to a
//! class or function. Text rules replace, append or prepend documentation
//! text; `xpath-replace` rules replace every node of the documentation XML
//! that an XPath expression selects.

use serde::{Deserialize, Serialize};

/// How a rule changes documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocModificationMode {
    /// Replace the whole text with `code`.
    #[default]
    Replace,
    Append,
    Prepend,
    /// Replace nodes matched by `xpath` with `code`.
    XpathReplace,
}

/// A single documentation modification rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocModification {
    #[serde(default)]
    mode: DocModificationMode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    xpath: String,
    #[serde(default)]
    code: String,
}

impl DocModification {
    /// A text rule (`replace`, `append` or `prepend`).
    pub fn text(mode: DocModificationMode, code: impl Into<String>) -> Self {
        Self {
            mode,
            code: code.into(),
            ..Self::default()
        }
    }

    /// An `xpath-replace` rule.
    pub fn xpath_replace(xpath: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            mode: DocModificationMode::XpathReplace,
            xpath: xpath.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    /// Scope this rule to the function with the given minimal signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn mode(&self) -> DocModificationMode {
        self.mode
    }

    /// Minimal signature of the function this rule applies to; empty for class rules.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn xpath(&self) -> &str {
        &self.xpath
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_xpath(&self) -> bool {
        self.mode == DocModificationMode::XpathReplace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Rules {
        rule: Vec<DocModification>,
    }

    #[test]
    fn parse_modes_and_defaults() {
        let toml = r#"
[[rule]]
code = "Whole new text."

[[rule]]
mode = "xpath-replace"
xpath = "//para[1]"
code = "<para>First</para>"

[[rule]]
mode = "append"
signature = "show()"
code = " See also hide()."
"#;
        let rules: Rules = toml::from_str(toml).unwrap();
        let [replace, xpath, append] = rules.rule.as_slice() else {
            panic!("expected three rules");
        };

        assert_eq!(replace.mode(), DocModificationMode::Replace);
        assert!(replace.signature().is_empty());

        assert!(xpath.is_xpath());
        assert_eq!(xpath.xpath(), "//para[1]");

        assert_eq!(append.mode(), DocModificationMode::Append);
        assert_eq!(append.signature(), "show()");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let toml = "[[rule]]\nmode = \"delete\"\n";
        assert!(toml::from_str::<Rules>(toml).is_err());
    }

    #[test]
    fn builders() {
        let rule = DocModification::xpath_replace("//brief", "x")
            .with_signature("resize(int,int)");
        assert!(rule.is_xpath());
        assert_eq!(rule.signature(), "resize(int,int)");
        assert_eq!(rule.code(), "x");

        let text = DocModification::text(DocModificationMode::Prepend, "Note: ");
        assert!(!text.is_xpath());
        assert!(text.xpath().is_empty());
    }
}
