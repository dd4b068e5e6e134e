use std::any::Any;
use std::rc::Rc;

use log::trace;

use crate::compiler::{Expr, RawExprHandle};
use crate::dtype::Value;

/// Native handle of a storage node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub usize);

/// Reference to a storage node in the compiler's data layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SNodeRef {
    pub id: u32,
    pub ptr: NativeHandle,
}

/// A template argument, classified by what it can provide.
///
/// Extraction checks capabilities in variant order: storage node,
/// expression, raw expression handle, tuple, then anything else passed
/// through as is.
#[derive(Clone, Debug)]
pub enum TemplateArg {
    SNode(SNodeRef),
    Expr(Expr),
    RawExpr(RawExprHandle),
    Tuple(Vec<TemplateArg>),
    Value(Value),
    /// Any other object; resolved by identity.
    Opaque(Rc<dyn Any>),
}

/// What a template argument resolves to for the kernel's opaque slots.
#[derive(Clone, Debug)]
pub enum TemplateValue {
    Handle(NativeHandle),
    Address(usize),
    Tuple(Vec<TemplateValue>),
    Value(Value),
    /// A buffer passed where a template was expected, by identity.
    Array { address: usize, byte_len: usize },
    Opaque(Rc<dyn Any>),
}

impl PartialEq for TemplateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TemplateValue::Handle(a), TemplateValue::Handle(b)) => a == b,
            (TemplateValue::Address(a), TemplateValue::Address(b)) => a == b,
            (TemplateValue::Tuple(a), TemplateValue::Tuple(b)) => a == b,
            (TemplateValue::Value(a), TemplateValue::Value(b)) => a == b,
            (
                TemplateValue::Array { address, byte_len },
                TemplateValue::Array {
                    address: other_address,
                    byte_len: other_len,
                },
            ) => address == other_address && byte_len == other_len,
            (TemplateValue::Opaque(a), TemplateValue::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl TemplateArg {
    pub fn tuple(items: impl IntoIterator<Item = TemplateArg>) -> Self {
        TemplateArg::Tuple(items.into_iter().collect())
    }

    pub fn opaque<T: Any>(object: T) -> Self {
        TemplateArg::Opaque(Rc::new(object))
    }

    /// Resolve to a native reference.
    pub fn extract(&self) -> TemplateValue {
        let value = match self {
            TemplateArg::SNode(snode) => TemplateValue::Handle(snode.ptr),
            TemplateArg::Expr(expr) => TemplateValue::Address(expr.address()),
            TemplateArg::RawExpr(raw) => TemplateValue::Address(raw.address()),
            TemplateArg::Tuple(items) => {
                TemplateValue::Tuple(items.iter().map(TemplateArg::extract).collect())
            }
            TemplateArg::Value(v) => TemplateValue::Value(*v),
            TemplateArg::Opaque(object) => TemplateValue::Opaque(Rc::clone(object)),
        };
        trace!("template {} -> {:?}", self.kind_name(), value);
        value
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TemplateArg::SNode(_) => "snode",
            TemplateArg::Expr(_) => "expr",
            TemplateArg::RawExpr(_) => "raw expr",
            TemplateArg::Tuple(_) => "tuple",
            TemplateArg::Value(_) => "value",
            TemplateArg::Opaque(_) => "opaque",
        }
    }
}

impl From<Value> for TemplateArg {
    fn from(v: Value) -> Self {
        TemplateArg::Value(v)
    }
}

impl From<SNodeRef> for TemplateArg {
    fn from(snode: SNodeRef) -> Self {
        TemplateArg::SNode(snode)
    }
}

impl From<Expr> for TemplateArg {
    fn from(expr: Expr) -> Self {
        TemplateArg::Expr(expr)
    }
}

impl From<RawExprHandle> for TemplateArg {
    fn from(raw: RawExprHandle) -> Self {
        TemplateArg::RawExpr(raw)
    }
}
