//! Gander execution engine.
//!
//! Walks a resolved [`Program`](gander_types::Program) with an operand
//! stack, a global variable environment and a call stack, dispatching
//! built-in I/O calls to an injected input source and output sink.

pub mod arith;
pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod machine;
pub mod stack;

pub use arith::{promote, ArithOp};
pub use builtins::Builtin;
pub use config::EngineConfig;
pub use env::Environment;
pub use error::{EvalError, EvalResult, Fault};
pub use machine::Machine;
pub use stack::OperandStack;
