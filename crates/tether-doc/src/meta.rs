//! Declaration model consumed by the documentation pipeline.
//!
//! These are the already-parsed native declarations: classes with their
//! host-visible functions and signals, functions with their arguments, and
//! enums. Parsing native headers is someone else's job; this module only
//! carries the facts the rule filter needs.

use crate::modification::DocModification;
use crate::typesystem::{AddedFunction, TypeEntry};

/// Native access specifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// What kind of member a function is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunctionKind {
    #[default]
    Normal,
    Constructor,
    CopyConstructor,
    MoveConstructor,
    AssignmentOperator,
    MoveAssignmentOperator,
    ConversionOperator,
    Signal,
}

/// How an argument is passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceKind {
    #[default]
    Value,
    LValue,
    /// Transient (rvalue) reference.
    RValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaArgument {
    pub name: String,
    pub type_name: String,
    pub reference: ReferenceKind,
}

impl MetaArgument {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            reference: ReferenceKind::Value,
        }
    }

    pub fn by_reference(mut self, reference: ReferenceKind) -> Self {
        self.reference = reference;
        self
    }

    /// The argument's type as it appears in a minimal signature.
    pub fn signature_type(&self) -> String {
        match self.reference {
            ReferenceKind::Value => self.type_name.clone(),
            ReferenceKind::LValue => format!("{}&", self.type_name),
            ReferenceKind::RValue => format!("{}&&", self.type_name),
        }
    }
}

/// A parsed native function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFunction {
    pub name: String,
    pub arguments: Vec<MetaArgument>,
    pub access: Access,
    pub kind: FunctionKind,
    pub is_const: bool,
    /// Synthesized by the generator (e.g. a copy pulled in from a base class).
    pub is_added_method: bool,
    /// Declared by the configuration rather than by native source.
    pub is_user_added: bool,
    /// Removed from the bindings by configuration.
    pub is_modified_removed: bool,
    /// Class the function is declared on.
    pub declaring_class: String,
    /// Class whose function list this entry belongs to.
    pub owner_class: String,
    added_doc_modifications: Vec<DocModification>,
}

impl MetaFunction {
    /// A public, non-const, natively declared function of `class`.
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        let class = class.into();
        Self {
            name: name.into(),
            arguments: Vec::new(),
            access: Access::Public,
            kind: FunctionKind::Normal,
            is_const: false,
            is_added_method: false,
            is_user_added: false,
            is_modified_removed: false,
            declaring_class: class.clone(),
            owner_class: class,
            added_doc_modifications: Vec::new(),
        }
    }

    /// A natively declared function of `class` described by a minimal
    /// signature such as `resize(int,int)` or `size() const`.
    ///
    /// Argument names are not part of a signature and are left empty.
    pub fn from_signature(signature: &str, class: impl Into<String>) -> Self {
        let signature = signature.trim();
        let (name, rest) = signature.split_once('(').unwrap_or((signature, ""));
        let mut function = Self::new(name.trim(), class);
        if let Some((args, qualifiers)) = rest.rsplit_once(')') {
            function.arguments = args
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(argument_from_signature)
                .collect();
            function.is_const = qualifiers.trim() == "const";
        }
        function
    }

    /// A function declared by the configuration on `class`.
    pub fn added(added: &AddedFunction, class: impl Into<String>) -> Self {
        let mut function = Self::from_signature(&added.signature, class);
        function.is_user_added = true;
        function.added_doc_modifications = added.doc_modifications().to_vec();
        function
    }

    pub fn with_argument(mut self, argument: MetaArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Mark this entry as inherited from `declaring_class`.
    pub fn inherited_from(mut self, declaring_class: impl Into<String>) -> Self {
        self.declaring_class = declaring_class.into();
        self
    }

    /// Rules attached to a configuration-declared function.
    pub fn added_doc_modifications(&self) -> &[DocModification] {
        &self.added_doc_modifications
    }

    /// Canonical signature used to match function-scoped rules:
    /// `name(type1,type2)`, suffixed with `const` for const methods.
    pub fn minimal_signature(&self) -> String {
        let args: Vec<String> = self.arguments.iter().map(|a| a.signature_type()).collect();
        let mut signature = format!("{}({})", self.name, args.join(","));
        if self.is_const {
            signature.push_str("const");
        }
        signature
    }

    pub fn is_private(&self) -> bool {
        self.access == Access::Private
    }

    pub fn is_signal(&self) -> bool {
        self.kind == FunctionKind::Signal
    }

    pub fn is_conversion_operator(&self) -> bool {
        self.kind == FunctionKind::ConversionOperator
    }

    /// Move constructor or move assignment.
    pub fn is_move_operation(&self) -> bool {
        matches!(
            self.kind,
            FunctionKind::MoveConstructor | FunctionKind::MoveAssignmentOperator
        )
    }

    pub fn has_rvalue_argument(&self) -> bool {
        self.arguments
            .iter()
            .any(|a| a.reference == ReferenceKind::RValue)
    }
}

fn argument_from_signature(ty: &str) -> MetaArgument {
    if let Some(base) = ty.strip_suffix("&&") {
        MetaArgument::new("", base.trim_end()).by_reference(ReferenceKind::RValue)
    } else if let Some(base) = ty.strip_suffix('&') {
        MetaArgument::new("", base.trim_end()).by_reference(ReferenceKind::LValue)
    } else {
        MetaArgument::new("", ty)
    }
}

/// A parsed native class together with its configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaClass {
    pub name: String,
    pub entry: TypeEntry,
    /// Functions visible from the host language, in declaration order.
    pub functions: Vec<MetaFunction>,
    /// Native signals, documented after the other functions.
    pub signals: Vec<MetaFunction>,
}

impl MetaClass {
    pub fn new(entry: TypeEntry) -> Self {
        Self {
            name: entry.name.clone(),
            entry,
            functions: Vec::new(),
            signals: Vec::new(),
        }
    }

    /// Add the configuration-declared functions of the entry to `functions`.
    pub fn with_added_functions(mut self) -> Self {
        let added: Vec<MetaFunction> = self
            .entry
            .added_functions()
            .iter()
            .map(|a| MetaFunction::added(a, self.name.clone()))
            .collect();
        self.functions.extend(added);
        self
    }

    pub fn with_function(mut self, function: MetaFunction) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_signal(mut self, signal: MetaFunction) -> Self {
        self.signals.push(signal.with_kind(FunctionKind::Signal));
        self
    }

    pub fn find_function(&self, signature: &str) -> Option<&MetaFunction> {
        self.functions
            .iter()
            .chain(&self.signals)
            .find(|f| f.minimal_signature() == signature)
    }
}

/// Host enum base classes an enum can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnumKind {
    Enum,
    IntEnum,
    Flag,
    IntFlag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEnum {
    pub name: String,
    /// Base class requested by configuration, if any.
    pub declared_kind: Option<HostEnumKind>,
    /// Whether a flags type is associated with the enum.
    pub has_flags: bool,
}
