//! `tether check` — typesystem validation.

use std::path::Path;

use anyhow::{Context, Result};
use tether_doc::Typesystem;

/// Parse and validate a typesystem file, then print a summary of it.
pub fn run(path: &Path) -> Result<()> {
    let ts = Typesystem::load(path).with_context(|| format!("loading {}", path.display()))?;
    print!("{}", summary(&ts));
    Ok(())
}

fn summary(ts: &Typesystem) -> String {
    let mut out = format!("package {}: {} types\n", ts.package, ts.types.len());
    for entry in &ts.types {
        let class_xpath = entry.doc_modifications().iter().filter(|r| r.is_xpath()).count();
        let function_xpath = entry
            .function_doc_modifications()
            .iter()
            .filter(|r| r.is_xpath())
            .count();
        out.push_str(&format!(
            "  {} ({:?}): {} class rules ({} xpath), {} function rules ({} xpath)\n",
            entry.name,
            entry.kind,
            entry.doc_modifications().len(),
            class_xpath,
            entry.function_doc_modifications().len(),
            function_xpath,
        ));
        for added in entry.added_functions() {
            out.push_str(&format!(
                "    added {}: {} rules\n",
                added.name(),
                added.doc_modifications().len()
            ));
        }
    }
    out
}
