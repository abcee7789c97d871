use std::collections::HashMap;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::ast::{Ast, NodeId};

// Slot names of keyed nodes.
pub const TYPE: &str = "type";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const LHS: &str = "lhs";
pub const RHS: &str = "rhs";
pub const CALLEE: &str = "callee";
pub const ARGUMENTS: &str = "arguments";
pub const TARGET: &str = "target";
pub const VALUE: &str = "value";
pub const PREDICATE: &str = "predicate";
pub const THEN: &str = "then";
pub const PARAMETERS: &str = "parameters";
pub const BODY: &str = "body";

/// Binary Operators
///
/// Arithmetic and comparison operators share the same operand contract: both
/// sides must have the same integer type, and the result has that type too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Sum,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Gt,
    Lt,
    Geq,
    Leq,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Neq
                | BinaryOperator::Gt
                | BinaryOperator::Lt
                | BinaryOperator::Geq
                | BinaryOperator::Leq
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Sum => "Sum",
            BinaryOperator::Sub => "Sub",
            BinaryOperator::Mul => "Mul",
            BinaryOperator::Div => "Div",
            BinaryOperator::Mod => "Mod",
            BinaryOperator::Eq => "Eq",
            BinaryOperator::Neq => "Neq",
            BinaryOperator::Gt => "Gt",
            BinaryOperator::Lt => "Lt",
            BinaryOperator::Geq => "Geq",
            BinaryOperator::Leq => "Leq",
        }
    }
}

/// Builtin Types
///
/// The nominal types registered once per program in the outermost scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Int8,
    Int16,
    Int32,
    Int64,
    Function,
}

impl BasicType {
    pub const BUILTINS: [BasicType; 5] = [
        BasicType::Int8,
        BasicType::Int16,
        BasicType::Int32,
        BasicType::Int64,
        BasicType::Function,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BasicType::Int8 => "int8",
            BasicType::Int16 => "int16",
            BasicType::Int32 => "int32",
            BasicType::Int64 => "int64",
            BasicType::Function => "fn()",
        }
    }

    /// Width in bits for integer types, `None` for the function type.
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            BasicType::Int8 => Some(8),
            BasicType::Int16 => Some(16),
            BasicType::Int32 => Some(32),
            BasicType::Int64 => Some(64),
            BasicType::Function => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.bit_width().is_some()
    }
}

/// A write-once link from a reference to the entity it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Binding {
    #[default]
    Unresolved,
    Resolved(NodeId),
}

impl Binding {
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Binding::Unresolved => None,
            Binding::Resolved(target) => Some(*target),
        }
    }
}

/// Whether a reference denotes a storage location or the value stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueCategory {
    #[default]
    Value,
    Place,
}

/// Symbol table carried by every `Scope` node.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    pub names: HashMap<String, NodeId>,
    pub parent_scope: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Module,
    Block,
    Scope(ScopeTable),
    ParameterList,
    ArgumentList,
    Function {
        name: String,
    },
    VarDecl {
        name: String,
    },
    Variable {
        name: String,
    },
    Reference {
        name: String,
        target: Binding,
        category: ValueCategory,
    },
    Type(BasicType),
    Number {
        value: i64,
    },
    BinaryOp(BinaryOperator),
    Assignment,
    Call,
    Cast,
    If,
    Print,
}

impl NodeKind {
    /// Slot layout of keyed kinds; `None` marks a sequence kind.
    pub fn slots(&self) -> Option<&'static [&'static str]> {
        match self {
            NodeKind::Module
            | NodeKind::Block
            | NodeKind::Scope(_)
            | NodeKind::ParameterList
            | NodeKind::ArgumentList => None,
            NodeKind::Function { .. } => Some(&[PARAMETERS, BODY, TYPE]),
            NodeKind::VarDecl { .. } => Some(&[VALUE]),
            NodeKind::Variable { .. } => Some(&[TYPE]),
            NodeKind::Reference { .. } => Some(&[TYPE]),
            NodeKind::Type(_) => Some(&[]),
            NodeKind::Number { .. } => Some(&[TYPE]),
            NodeKind::BinaryOp(_) => Some(&[LEFT, RIGHT, TYPE]),
            NodeKind::Assignment => Some(&[LHS, RHS, TYPE]),
            NodeKind::Call => Some(&[CALLEE, ARGUMENTS]),
            NodeKind::Cast => Some(&[TARGET, VALUE, TYPE]),
            NodeKind::If => Some(&[PREDICATE, THEN]),
            NodeKind::Print => Some(&[VALUE]),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::Block => "Block",
            NodeKind::Scope(_) => "Scope",
            NodeKind::ParameterList => "ParameterList",
            NodeKind::ArgumentList => "ArgumentList",
            NodeKind::Function { .. } => "Function",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::Variable { .. } => "Variable",
            NodeKind::Reference { .. } => "Reference",
            NodeKind::Type(_) => "Type",
            NodeKind::Number { .. } => "Number",
            NodeKind::BinaryOp(op) => op.name(),
            NodeKind::Assignment => "Assignment",
            NodeKind::Call => "Call",
            NodeKind::Cast => "Cast",
            NodeKind::If => "If",
            NodeKind::Print => "Print",
        }
    }

    /// The declared or referenced name, for kinds that carry one.
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Function { name }
            | NodeKind::VarDecl { name }
            | NodeKind::Variable { name }
            | NodeKind::Reference { name, .. } => Some(name),
            NodeKind::Type(basic) => Some(basic.name()),
            _ => None,
        }
    }
}

// Constructors
impl Ast {
    fn create(&mut self, kind: NodeKind, span: Option<Span>) -> NodeId {
        self.add_node(kind, span)
    }

    pub fn create_number(&mut self, value: i64, span: Option<Span>) -> NodeId {
        self.create(NodeKind::Number { value }, span)
    }

    pub fn create_reference(&mut self, name: impl Into<String>, span: Option<Span>) -> NodeId {
        self.create(
            NodeKind::Reference {
                name: name.into(),
                target: Binding::Unresolved,
                category: ValueCategory::Value,
            },
            span,
        )
    }

    pub fn create_variable(&mut self, name: impl Into<String>, span: Option<Span>) -> NodeId {
        self.create(NodeKind::Variable { name: name.into() }, span)
    }

    /// A function parameter: a `Variable` whose type slot names its declared type.
    pub fn create_parameter(
        &mut self,
        type_name: impl Into<String>,
        name: impl Into<String>,
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let parameter = self.create_variable(name, span.clone());
        let type_ref = self.create_reference(type_name, span);
        self.set_slot(parameter, TYPE, Some(type_ref))?;
        Ok(parameter)
    }

    pub fn create_type(&mut self, basic: BasicType) -> NodeId {
        self.create(NodeKind::Type(basic), None)
    }

    pub fn create_scope(&mut self, span: Option<Span>) -> NodeId {
        self.create(NodeKind::Scope(ScopeTable::default()), span)
    }

    pub fn create_block(&mut self, statements: &[NodeId], span: Option<Span>) -> Result<NodeId, Error> {
        let block = self.create(NodeKind::Block, span);
        self.add_children(block, statements)?;
        Ok(block)
    }

    pub fn create_binary(
        &mut self,
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let binary = self.create(NodeKind::BinaryOp(operator), span);
        self.set_slot(binary, LEFT, Some(left))?;
        self.set_slot(binary, RIGHT, Some(right))?;
        Ok(binary)
    }

    pub fn create_assignment(
        &mut self,
        lhs: NodeId,
        rhs: NodeId,
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let assignment = self.create(NodeKind::Assignment, span);
        self.set_slot(assignment, LHS, Some(lhs))?;
        self.set_slot(assignment, RHS, Some(rhs))?;
        Ok(assignment)
    }

    pub fn create_call(
        &mut self,
        callee: NodeId,
        arguments: &[NodeId],
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let call = self.create(NodeKind::Call, span.clone());
        let list = self.create(NodeKind::ArgumentList, span);
        self.add_children(list, arguments)?;
        self.set_slot(call, CALLEE, Some(callee))?;
        self.set_slot(call, ARGUMENTS, Some(list))?;
        Ok(call)
    }

    pub fn create_cast(
        &mut self,
        target: NodeId,
        value: NodeId,
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let cast = self.create(NodeKind::Cast, span);
        self.set_slot(cast, TARGET, Some(target))?;
        self.set_slot(cast, VALUE, Some(value))?;
        Ok(cast)
    }

    pub fn create_var_decl(
        &mut self,
        name: impl Into<String>,
        value: NodeId,
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let decl = self.create(NodeKind::VarDecl { name: name.into() }, span);
        self.set_slot(decl, VALUE, Some(value))?;
        Ok(decl)
    }

    pub fn create_print(&mut self, value: NodeId, span: Option<Span>) -> Result<NodeId, Error> {
        let print = self.create(NodeKind::Print, span);
        self.set_slot(print, VALUE, Some(value))?;
        Ok(print)
    }

    pub fn create_if(
        &mut self,
        predicate: NodeId,
        statements: &[NodeId],
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let node = self.create(NodeKind::If, span.clone());
        let block = self.create_block(statements, span)?;
        self.set_slot(node, PREDICATE, Some(predicate))?;
        self.set_slot(node, THEN, Some(block))?;
        Ok(node)
    }

    pub fn create_function(
        &mut self,
        name: impl Into<String>,
        parameters: &[NodeId],
        statements: &[NodeId],
        span: Option<Span>,
    ) -> Result<NodeId, Error> {
        let function = self.create(NodeKind::Function { name: name.into() }, span.clone());
        let list = self.create(NodeKind::ParameterList, span.clone());
        self.add_children(list, parameters)?;
        let body = self.create_block(statements, span)?;
        self.set_slot(function, PARAMETERS, Some(list))?;
        self.set_slot(function, BODY, Some(body))?;
        Ok(function)
    }
}

// Semantic accessors shared by the passes
impl Ast {
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).name()
    }

    /// An error located at `id`'s source position, when it has one.
    pub fn error_at(&self, id: NodeId, error: ErrorImpl) -> Error {
        Error::without_position(error).or_position(self.position(id))
    }

    pub fn basic_type(&self, id: NodeId) -> Option<BasicType> {
        match self.kind(id) {
            NodeKind::Type(basic) => Some(*basic),
            _ => None,
        }
    }

    pub fn is_type(&self, id: NodeId) -> bool {
        self.basic_type(id).is_some()
    }

    pub fn reference_target(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::Reference { target, .. } => target.target(),
            _ => None,
        }
    }

    /// Binds a reference to its target. A reference is bound once; binding it
    /// again to the same target is accepted, to another one is not.
    pub fn bind_reference(&mut self, id: NodeId, entity: NodeId) -> Result<(), Error> {
        let description = self.describe(id);
        let position = self.position(id);
        match self.kind_mut(id) {
            NodeKind::Reference { target, .. } => match target {
                Binding::Unresolved => {
                    *target = Binding::Resolved(entity);
                    Ok(())
                }
                Binding::Resolved(existing) if *existing == entity => Ok(()),
                Binding::Resolved(_) => Err(Error::structural(format!(
                    "{} is already bound to another entity",
                    description
                ))
                .or_position(position)),
            },
            _ => Err(Error::structural(format!("{} is not a reference", description))
                .or_position(position)),
        }
    }

    pub fn category(&self, id: NodeId) -> Option<ValueCategory> {
        match self.kind(id) {
            NodeKind::Reference { category, .. } => Some(*category),
            _ => None,
        }
    }

    pub fn set_category(&mut self, id: NodeId, value: ValueCategory) -> Result<(), Error> {
        let description = self.describe(id);
        match self.kind_mut(id) {
            NodeKind::Reference { category, .. } => {
                *category = value;
                Ok(())
            }
            _ => Err(Error::structural(format!("{} is not a reference", description))),
        }
    }

    /// The `Type` node a typed node's type reference is bound to.
    pub fn target_type(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id, TYPE)
            .and_then(|type_ref| self.reference_target(type_ref))
            .filter(|target| self.is_type(*target))
    }

    pub fn target_basic_type(&self, id: NodeId) -> Option<BasicType> {
        self.target_type(id).and_then(|ty| self.basic_type(ty))
    }

    /// A fresh reference already bound to `type_id`.
    pub fn create_type_ref(&mut self, type_id: NodeId) -> Result<NodeId, Error> {
        let name = self
            .basic_type(type_id)
            .map(|basic| basic.name())
            .ok_or_else(|| Error::structural(format!("{} is not a type", self.describe(type_id))))?;
        let reference = self.create_reference(name, None);
        self.bind_reference(reference, type_id)?;
        Ok(reference)
    }

    /// Fixes the type of a typed node.
    ///
    /// An empty type slot receives a fresh reference to `type_id`. A slot that
    /// already denotes `type_id` is left alone; one that denotes another type
    /// is a type mismatch. A slot holding a still unresolved reference is an
    /// internal error.
    pub fn set_type(&mut self, id: NodeId, type_id: NodeId) -> Result<(), Error> {
        match self.slot(id, TYPE) {
            None => {
                let reference = self.create_type_ref(type_id)?;
                self.set_slot(id, TYPE, Some(reference))
            }
            Some(existing) => match self.reference_target(existing) {
                Some(current) if current == type_id => Ok(()),
                Some(current) => Err(self.error_at(
                    id,
                    ErrorImpl::TypeMismatch {
                        expected: self.type_name(current),
                        received: self.type_name(type_id),
                    },
                )),
                None => Err(Error::structural(format!(
                    "type of {} is an unresolved reference",
                    self.describe(id)
                ))
                .or_position(self.position(id))),
            },
        }
    }

    pub fn type_name(&self, type_id: NodeId) -> String {
        match self.kind(type_id) {
            NodeKind::Type(basic) => basic.name().to_string(),
            _ => self.describe(type_id),
        }
    }

    pub fn scope_table(&self, id: NodeId) -> Option<&ScopeTable> {
        match self.kind(id) {
            NodeKind::Scope(table) => Some(table),
            _ => None,
        }
    }

    fn scope_table_mut(&mut self, id: NodeId) -> Result<&mut ScopeTable, Error> {
        let description = self.describe(id);
        match self.kind_mut(id) {
            NodeKind::Scope(table) => Ok(table),
            _ => Err(Error::structural(format!("{} is not a scope", description))),
        }
    }

    pub fn set_parent_scope(&mut self, scope: NodeId, parent: Option<NodeId>) -> Result<(), Error> {
        self.scope_table_mut(scope)?.parent_scope = parent;
        Ok(())
    }

    /// Declares `name` in `scope`. Names are unique within one scope.
    pub fn register(&mut self, scope: NodeId, name: &str, entity: NodeId) -> Result<(), Error> {
        let already_declared = self
            .scope_table(scope)
            .is_some_and(|table| table.names.contains_key(name));
        if already_declared {
            return Err(self.error_at(
                entity,
                ErrorImpl::AlreadyDeclared {
                    name: name.to_string(),
                },
            ));
        }
        self.scope_table_mut(scope)?
            .names
            .insert(name.to_string(), entity);
        Ok(())
    }

    /// Looks `name` up in `scope` and then in each enclosing scope.
    pub fn resolve(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        let mut current = Some(scope);

        while let Some(scope) = current {
            let table = self.scope_table(scope)?;
            if let Some(entity) = table.names.get(name) {
                return Some(*entity);
            }
            current = table.parent_scope;
        }

        None
    }
}
