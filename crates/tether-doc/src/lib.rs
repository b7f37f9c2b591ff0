//! Documentation rule filtering and XPath templating for tether bindings.
//!
//! Selects the documentation modification rules that apply to a class or
//! function and rewrites extracted documentation XML with them through an
//! external XSLT engine.
//!
//! ## Modules
//!
//! - [`modification`] — Documentation modification rules
//! - [`typesystem`] — Typesystem configuration (`.toml`) parsing
//! - [`meta`] — Parsed class, function and enum declarations
//! - [`filter`] — Rule selection and documentable function listing
//! - [`template`] — XSL program synthesis and rule application
//! - [`service`] — Query/transform engine traits and the `xsltproc` adapter
//! - [`diagnostics`] — Warnings and the [`WarningSink`] collaborator

pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod meta;
pub mod modification;
pub mod service;
pub mod template;
pub mod typesystem;

// Re-export key types for convenience
pub use diagnostics::{Diagnostic, Severity, StderrSink, WarningSink};
pub use error::DocError;
pub use filter::{
    class_doc_modifications, class_xpath_doc_modifications, documentable_functions,
    enum_base_class, function_doc_modifications, function_xpath_doc_modifications,
    should_skip_for_documentation,
};
pub use meta::{MetaArgument, MetaClass, MetaEnum, MetaFunction};
pub use modification::{DocModification, DocModificationMode};
pub use service::{XQuery, XslTransform, XsltProc};
pub use template::{apply_doc_modifications, apply_text_modifications, documentation};
pub use typesystem::{AddedFunction, TypeEntry, TypeKind, Typesystem};
