//! The compiler-core collaborator.
//!
//! Argument marshaling only needs a narrow slice of a JIT compiler:
//! declaring argument and return slots on the kernel being traced, and
//! building the expressions the kernel body reads those slots through.
//! [`CompilerCore`] is that slice. [`KernelBuildContext`] is the
//! in-process implementation: it owns the in-progress signature and the
//! expressions created against it, and is passed explicitly to every
//! declaration.

mod context;

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::config::TypeDefaults;
use crate::dtype::PrimitiveType;

pub use context::{ArgDecl, KernelBuildContext};

/// Identifier of a declared argument or return slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An expression node in the kernel body's graph.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprNode {
    /// Read of a scalar argument slot.
    ArgLoad { slot: SlotId, dtype: PrimitiveType },
    /// An external array bound to an argument slot.
    ExternalTensor {
        dtype: PrimitiveType,
        dim: usize,
        slot: SlotId,
    },
}

/// Handle to an expression node.
///
/// Clones share the node. Identity is the node's address, which is what
/// template arguments carrying an expression resolve to.
#[derive(Clone, Debug)]
pub struct Expr {
    node: Rc<ExprNode>,
}

impl Expr {
    pub fn new(node: ExprNode) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    /// Address of the underlying expression node.
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.node) as usize
    }

    /// The low-level handle for this expression.
    pub fn raw(&self) -> RawExprHandle {
        RawExprHandle(self.address())
    }

    /// Slot this expression reads from.
    pub fn slot(&self) -> SlotId {
        match *self.node {
            ExprNode::ArgLoad { slot, .. } | ExprNode::ExternalTensor { slot, .. } => slot,
        }
    }

    pub fn dtype(&self) -> PrimitiveType {
        match *self.node {
            ExprNode::ArgLoad { dtype, .. } | ExprNode::ExternalTensor { dtype, .. } => dtype,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

/// Raw address of an expression node, as handed across a native boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawExprHandle(pub usize);

impl RawExprHandle {
    pub fn address(self) -> usize {
        self.0
    }
}

/// Opaque failure reported by the compiler core.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("compiler core: {message}")]
pub struct CoreError {
    message: String,
}

impl CoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The operations the declaration step needs from a JIT compiler core.
///
/// Every call mutates the kernel signature being traced, so calls are
/// order-dependent: declaring twice yields two distinct slots.
pub trait CompilerCore {
    /// Types that generic dtypes normalize to.
    fn type_defaults(&self) -> TypeDefaults;

    /// Append an argument slot to the signature.
    fn declare_argument(
        &mut self,
        dtype: PrimitiveType,
        is_external_array: bool,
    ) -> Result<SlotId, CoreError>;

    /// Append a return slot to the signature.
    fn declare_return(&mut self, dtype: PrimitiveType) -> Result<SlotId, CoreError>;

    /// Build an expression reading a scalar argument slot.
    fn make_arg_load_expr(&mut self, slot: SlotId, dtype: PrimitiveType) -> Expr;

    /// Build an expression for an external array bound to a slot.
    fn make_external_tensor_expr(&mut self, dtype: PrimitiveType, dim: usize, slot: SlotId) -> Expr;
}
