//! `tether doctor` — external tool diagnostics.

use anyhow::Result;
use tether_doc::XsltProc;

/// Print version and tool availability.
pub fn run() -> Result<()> {
    println!("=== Tether Doctor ===");
    println!();
    println!("Tether version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- System Tools ---");
    match XsltProc::new().version() {
        Some(version) => println!("  xsltproc: {version}"),
        None => println!("  xsltproc: not found (XPath documentation rules cannot be applied)"),
    }

    Ok(())
}
