//! Property test strategies for stack operation scripts
//!
//! Scripts only drop when the stack holds at least two values, as the demo
//! front end does: dropping the last value would turn the first log entry
//! into a waypoint with nothing regular behind it.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOp<T> {
    /// `push(value)`
    Push(T),
    /// `pop()`
    Pop,
    /// `drop_top()`, skipped below two values
    Drop,
    /// The user presses back
    UserBack,
    /// The user presses forward
    UserForward,
}

/// Strategy for application operations only.
pub fn arb_app_op() -> impl Strategy<Value = StackOp<u8>> {
    prop_oneof![
        4 => any::<u8>().prop_map(StackOp::Push),
        2 => Just(StackOp::Pop),
        2 => Just(StackOp::Drop),
    ]
}

/// Strategy for application operations interleaved with user gestures.
pub fn arb_op() -> impl Strategy<Value = StackOp<u8>> {
    prop_oneof![
        4 => any::<u8>().prop_map(StackOp::Push),
        2 => Just(StackOp::Pop),
        2 => Just(StackOp::Drop),
        1 => Just(StackOp::UserBack),
        1 => Just(StackOp::UserForward),
    ]
}

/// Script of up to `max_len` application operations.
pub fn arb_app_script(max_len: usize) -> impl Strategy<Value = Vec<StackOp<u8>>> {
    prop::collection::vec(arb_app_op(), 0..=max_len)
}

/// Script of up to `max_len` operations including user gestures.
pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<StackOp<u8>>> {
    prop::collection::vec(arb_op(), 0..=max_len)
}

/// Reference model of the stack under application operations.
///
/// User gestures are not modelled; they panic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackModel<T> {
    stack: Vec<T>,
}

impl<T: Clone> StackModel<T> {
    /// An empty model.
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Apply one application operation.
    pub fn apply(&mut self, op: &StackOp<T>) {
        match op {
            StackOp::Push(value) => self.stack.push(value.clone()),
            StackOp::Pop => {
                self.stack.pop();
            }
            StackOp::Drop => {
                if self.stack.len() >= 2 {
                    self.stack.pop();
                }
            }
            StackOp::UserBack | StackOp::UserForward => {
                panic!("user gestures are not modelled")
            }
        }
    }

    /// The modelled stack.
    pub fn stack(&self) -> &[T] {
        &self.stack
    }
}
