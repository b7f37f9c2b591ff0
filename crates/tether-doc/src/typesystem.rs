//! Typesystem configuration (`.toml`) parsing.
//!
//! A typesystem file names the package being bound and carries one entry
//! per native type, each with the documentation rules configured for the
//! type, for its functions and for the functions the configuration adds.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocError, Result};
use crate::modification::DocModification;

/// A complete typesystem parsed from a `.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typesystem {
    /// Name of the generated package.
    pub package: String,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// The kind of native type an entry configures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// Identity-bearing type passed by pointer.
    #[default]
    Object,
    Value,
    Namespace,
}

/// Configuration for one native type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    doc_modifications: Vec<DocModification>,
    #[serde(default)]
    function_doc_modifications: Vec<DocModification>,
    #[serde(default)]
    added_functions: Vec<AddedFunction>,
}

/// A function synthesized by the configuration rather than declared natively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddedFunction {
    /// Minimal signature, e.g. `extra(int)`.
    pub signature: String,
    #[serde(default)]
    doc_modifications: Vec<DocModification>,
}

impl Typesystem {
    /// Parse and validate a typesystem from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let typesystem: Typesystem = toml::from_str(input)?;
        typesystem.validate()?;
        Ok(typesystem)
    }

    /// Parse a typesystem from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeEntry> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Check the structural rules serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.types {
            if entry.name.is_empty() {
                return Err(invalid("type entry with an empty name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(invalid(format!("type '{}' is declared twice", entry.name)));
            }
            for rule in &entry.doc_modifications {
                check_xpath(&entry.name, rule)?;
            }
            for rule in &entry.function_doc_modifications {
                check_xpath(&entry.name, rule)?;
                if rule.signature().is_empty() {
                    return Err(invalid(format!(
                        "function documentation rule on '{}' has no signature",
                        entry.name
                    )));
                }
            }
            for added in &entry.added_functions {
                if added.signature.trim().is_empty() {
                    return Err(invalid(format!(
                        "added function on '{}' has an empty signature",
                        entry.name
                    )));
                }
                for rule in &added.doc_modifications {
                    check_xpath(&entry.name, rule)?;
                }
            }
        }
        Ok(())
    }
}

fn check_xpath(owner: &str, rule: &DocModification) -> Result<()> {
    if rule.is_xpath() && rule.xpath().trim().is_empty() {
        return Err(invalid(format!(
            "xpath-replace rule on '{owner}' has no xpath"
        )));
    }
    Ok(())
}

fn invalid(detail: String) -> DocError {
    DocError::InvalidTypesystem { detail }
}

impl TypeEntry {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Add a class-scoped rule.
    pub fn with_doc_modification(mut self, rule: DocModification) -> Self {
        self.doc_modifications.push(rule);
        self
    }

    /// Add a rule scoped to one function by its signature.
    pub fn with_function_doc_modification(mut self, rule: DocModification) -> Self {
        self.function_doc_modifications.push(rule);
        self
    }

    pub fn with_added_function(mut self, added: AddedFunction) -> Self {
        self.added_functions.push(added);
        self
    }

    /// Class-scoped rules, in configuration order.
    pub fn doc_modifications(&self) -> &[DocModification] {
        &self.doc_modifications
    }

    /// Function-scoped rules, in configuration order.
    pub fn function_doc_modifications(&self) -> &[DocModification] {
        &self.function_doc_modifications
    }

    pub fn added_functions(&self) -> &[AddedFunction] {
        &self.added_functions
    }
}

impl AddedFunction {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            doc_modifications: Vec::new(),
        }
    }

    pub fn with_doc_modification(mut self, rule: DocModification) -> Self {
        self.doc_modifications.push(rule);
        self
    }

    pub fn doc_modifications(&self) -> &[DocModification] {
        &self.doc_modifications
    }

    /// The function name part of the signature.
    pub fn name(&self) -> &str {
        let signature = self.signature.trim();
        signature
            .split_once('(')
            .map_or(signature, |(name, _)| name.trim())
    }
}
