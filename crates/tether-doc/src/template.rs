//! XSL program synthesis and application of documentation rules.

use crate::diagnostics::{modification_error, WarningSink};
use crate::modification::{DocModification, DocModificationMode};
use crate::service::{XQuery, XslTransform};

/// Templates copying every element with its attributes and recursing into
/// children. Text nodes are copied by the built-in template.
const IDENTITY_TEMPLATES: &str = r#"<xsl:template match="/">
    <xsl:apply-templates />
</xsl:template>
<xsl:template match="*">
<xsl:copy>
    <xsl:copy-of select="@*"/>
    <xsl:apply-templates/>
</xsl:copy>
</xsl:template>
"#;

/// Build the template program for `rules`: the identity templates followed
/// by one override per rule that emits the rule's code at each match.
pub fn xsl_program(rules: &[&DocModification]) -> String {
    let mut program = IDENTITY_TEMPLATES.to_string();
    for rule in rules {
        debug_assert!(rule.is_xpath(), "plain rule passed to xsl_program");
        let xpath = rule.xpath().replace('"', "&quot;");
        program.push_str(&format!(
            "<xsl:template match=\"{xpath}\">{}</xsl:template>\n",
            rule.code()
        ));
    }
    program
}

/// Apply XPath rules to documentation XML.
///
/// Returns `xml` unchanged when there are no rules or no text. A transform
/// error is reported to `sink` and the input is returned; a transform that
/// produces its input unchanged is reported as a likely misconfigured
/// XPath and its output returned.
pub fn apply_doc_modifications(
    rules: &[&DocModification],
    xml: &str,
    engine: &dyn XslTransform,
    sink: &mut dyn WarningSink,
) -> String {
    if rules.is_empty() || xml.is_empty() {
        return xml.to_string();
    }

    match engine.transform(xml, &xsl_program(rules)) {
        Ok(result) => {
            if result == xml {
                sink.warn(modification_error(
                    rules,
                    &format!("Query did not result in any modifications to \"{xml}\""),
                ));
            }
            result
        }
        Err(e) => {
            sink.warn(modification_error(rules, &e.to_string()));
            xml.to_string()
        }
    }
}

/// Apply plain rules in order. XPath rules are ignored.
pub fn apply_text_modifications(rules: &[&DocModification], text: &str) -> String {
    let mut text = text.to_string();
    for rule in rules {
        match rule.mode() {
            DocModificationMode::Replace => text = rule.code().to_string(),
            DocModificationMode::Append => text.push_str(rule.code()),
            DocModificationMode::Prepend => text.insert_str(0, rule.code()),
            DocModificationMode::XpathReplace => {}
        }
    }
    text
}

/// Extract documentation with `query` and apply `rules` to it.
///
/// A failing query is reported and treated as producing no text.
pub fn documentation(
    source: &dyn XQuery,
    query: &str,
    rules: &[&DocModification],
    engine: &dyn XslTransform,
    sink: &mut dyn WarningSink,
) -> String {
    let raw = match source.evaluate(query) {
        Ok(text) => text,
        Err(e) => {
            sink.warn(format!("documentation query \"{query}\" failed: {e}"));
            String::new()
        }
    };
    apply_doc_modifications(rules, raw.trim(), engine, sink)
}
