//! Gander resolver: turns instruction lines into a [`Program`].
//!
//! The resolver walks the tokenized source once, classifying each line
//! into an [`Instruction`] and recording where every label and function
//! lives so that forward references resolve before execution starts.
//!
//! [`Program`]: gander_types::Program
//! [`Instruction`]: gander_types::Instruction

mod resolver;

pub use resolver::{resolve, Resolver};
