//! Resolved instruction representation.
//!
//! Contains no execution semantics.

use crate::value::TypeTag;
use std::fmt;

/// Every opcode the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Declarations
    Lbl,
    Fn,
    Fne,

    // Stack
    Ld(TypeTag),
    Conv(TypeTag),

    // Variables
    StVar,
    StVarPeek,
    LdVar,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Debug
    Dbg,
    DbgPop,

    // Control flow
    Call,
    Br,
    BrNe,
}

impl OpCode {
    /// Look up an opcode by mnemonic. Matching ignores ASCII case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        let lower = mnemonic.to_ascii_lowercase();
        if let Some(suffix) = lower.strip_prefix("ld.") {
            return TypeTag::from_suffix(suffix).map(Self::Ld);
        }
        if let Some(suffix) = lower.strip_prefix("conv.") {
            return TypeTag::from_suffix(suffix).map(Self::Conv);
        }
        let opcode = match lower.as_str() {
            "lbl" => Self::Lbl,
            "fn" => Self::Fn,
            "fne" => Self::Fne,
            "stvar" => Self::StVar,
            "stvar.pk" => Self::StVarPeek,
            "ldvar" => Self::LdVar,
            "add" => Self::Add,
            "sub" => Self::Sub,
            "mul" => Self::Mul,
            "div" => Self::Div,
            "dbg" => Self::Dbg,
            "dbg.p" => Self::DbgPop,
            "call" => Self::Call,
            "br" => Self::Br,
            "br.ne" => Self::BrNe,
            _ => return None,
        };
        Some(opcode)
    }

    /// Whether a source line carrying this opcode must name an operand.
    pub fn takes_operand(self) -> bool {
        !matches!(
            self,
            Self::Fne
                | Self::Conv(_)
                | Self::Add
                | Self::Sub
                | Self::Mul
                | Self::Div
                | Self::Dbg
                | Self::DbgPop
        )
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ld(tag) => write!(f, "ld.{}", tag.suffix()),
            Self::Conv(tag) => write!(f, "conv.{}", tag.suffix()),
            Self::Lbl => f.write_str("lbl"),
            Self::Fn => f.write_str("fn"),
            Self::Fne => f.write_str("fne"),
            Self::StVar => f.write_str("stvar"),
            Self::StVarPeek => f.write_str("stvar.pk"),
            Self::LdVar => f.write_str("ldvar"),
            Self::Add => f.write_str("add"),
            Self::Sub => f.write_str("sub"),
            Self::Mul => f.write_str("mul"),
            Self::Div => f.write_str("div"),
            Self::Dbg => f.write_str("dbg"),
            Self::DbgPop => f.write_str("dbg.p"),
            Self::Call => f.write_str("call"),
            Self::Br => f.write_str("br"),
            Self::BrNe => f.write_str("br.ne"),
        }
    }
}

/// One resolved instruction. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operand: Option<String>,
    /// 1-based source line the instruction came from.
    pub line: u32,
}

impl Instruction {
    /// Create an instruction with no operand.
    pub fn new(opcode: OpCode, line: u32) -> Self {
        Self {
            opcode,
            operand: None,
            line,
        }
    }

    /// Create an instruction with an operand.
    pub fn with_operand(opcode: OpCode, operand: impl Into<String>, line: u32) -> Self {
        Self {
            opcode,
            operand: Some(operand.into()),
            line,
        }
    }

    pub fn operand(&self) -> Option<&str> {
        self.operand.as_deref()
    }
}
