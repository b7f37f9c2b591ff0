//! Selection of the documentation rules and functions that apply to a declaration.

use crate::meta::{FunctionKind, HostEnumKind, MetaClass, MetaEnum, MetaFunction};
use crate::modification::DocModification;

/// Plain (non-XPath) rules attached to the class's configuration entry.
pub fn class_doc_modifications(class: &MetaClass) -> Vec<&DocModification> {
    select(class.entry.doc_modifications(), false)
}

/// XPath rules attached to the class's configuration entry.
pub fn class_xpath_doc_modifications(class: &MetaClass) -> Vec<&DocModification> {
    select(class.entry.doc_modifications(), true)
}

/// Plain rules for `function`.
///
/// A configuration-declared function carries its own rules, returned
/// unfiltered. Otherwise the owning class's function rules are narrowed to
/// those whose signature equals the function's minimal signature. Without
/// an owning class there are no rules.
pub fn function_doc_modifications<'a>(
    function: &'a MetaFunction,
    class: Option<&'a MetaClass>,
) -> Vec<&'a DocModification> {
    function_rules(function, class, false)
}

/// XPath rules for `function`; see [`function_doc_modifications`].
pub fn function_xpath_doc_modifications<'a>(
    function: &'a MetaFunction,
    class: Option<&'a MetaClass>,
) -> Vec<&'a DocModification> {
    function_rules(function, class, true)
}

fn function_rules<'a>(
    function: &'a MetaFunction,
    class: Option<&'a MetaClass>,
    xpath: bool,
) -> Vec<&'a DocModification> {
    if function.is_user_added {
        return select(function.added_doc_modifications(), xpath);
    }
    let Some(class) = class else {
        return Vec::new();
    };
    let mut rules = select(class.entry.function_doc_modifications(), xpath);
    if !rules.is_empty() {
        let signature = function.minimal_signature();
        rules.retain(|rule| rule.signature() == signature);
    }
    rules
}

fn select(rules: &[DocModification], xpath: bool) -> Vec<&DocModification> {
    rules.iter().filter(|r| r.is_xpath() == xpath).collect()
}

/// Whether `function` is left out of the documentation.
///
/// Private, generator-synthesized, configuration-removed and inherited
/// functions are skipped, as are conversion operators, move constructors,
/// assignment operators and functions taking an rvalue reference.
pub fn should_skip_for_documentation(function: &MetaFunction) -> bool {
    if function.is_private()
        || function.is_added_method
        || function.is_modified_removed
        || function.declaring_class != function.owner_class
        || function.is_conversion_operator()
    {
        return true;
    }
    function.is_move_operation()
        || function.kind == FunctionKind::AssignmentOperator
        || function.has_rvalue_argument()
}

/// Functions to document for `class`, in order, followed by its signals.
///
/// Signals are taken from `class.signals` only, so a signal also present in
/// the function list is documented once, at the end.
pub fn documentable_functions(class: &MetaClass) -> Vec<&MetaFunction> {
    class
        .functions
        .iter()
        .filter(|f| !f.is_signal() && !should_skip_for_documentation(f) && !f.is_user_added)
        .chain(&class.signals)
        .collect()
}

/// Name of the host enum base class for `e`.
pub fn enum_base_class(e: &MetaEnum) -> &'static str {
    match e.declared_kind {
        Some(HostEnumKind::IntEnum) => "IntEnum",
        Some(HostEnumKind::Flag) => "Flag",
        Some(HostEnumKind::IntFlag) => "IntFlag",
        Some(HostEnumKind::Enum) | None if e.has_flags => "Flag",
        Some(HostEnumKind::Enum) | None => "Enum",
    }
}
