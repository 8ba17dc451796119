use serde::Serialize;

use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
    value::Value,
};

/// Maximum number of items a stack holds.
pub const CAPACITY: usize = 10;

/// A bounded LIFO stack.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    /// Items, bottom first.
    items: Vec<Value>,
}

/// Query view of a stack.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StackSnapshot {
    /// Items, bottom first.
    pub stack: Vec<Value>,
    /// Number of items.
    pub size: usize,
    /// Whether the stack is empty.
    pub is_empty: bool,
    /// Top item, if any.
    pub top: Option<Value>,
}

impl Stack {
    /// An empty stack.
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(CAPACITY),
        }
    }

    /// Push onto the top. Fails without side effects when full.
    pub fn push(&mut self, value: Value) -> Result<&[Value]> {
        if self.items.len() >= CAPACITY {
            return Err(Error::CapacityExceeded {
                structure: "Stack",
                capacity: CAPACITY,
            });
        }
        self.items.push(value);
        Ok(&self.items)
    }

    /// Remove and return the top item.
    pub fn pop(&mut self) -> Result<Value> {
        self.items.pop().ok_or(Error::EmptyStructure("Stack"))
    }

    /// The top item.
    pub fn peek(&self) -> Result<&Value> {
        self.items.last().ok_or(Error::EmptyStructure("Stack"))
    }

    /// Whether the stack holds nothing.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items, bottom first.
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

impl Engine for Stack {
    const KIND: EngineKind = EngineKind::Stack;
    type Snapshot = StackSnapshot;

    fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            stack: self.items.clone(),
            size: self.items.len(),
            is_empty: self.items.is_empty(),
            top: self.items.last().cloned(),
        }
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}
