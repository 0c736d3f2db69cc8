//! Binary arithmetic with numeric type promotion.
//!
//! Operands are named by pop order: `item1` is popped first (the top of the
//! stack), `item2` second. Every operator computes `item2 <op> item1`, so
//! `ld.i32 5`, `ld.i32 3`, `sub` leaves `2`.

use crate::error::{EvalError, EvalResult};
use gander_types::{TypeTag, Value};
use std::fmt;

/// The arithmetic opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
        }
    }
}

/// Pick the common type for two numeric tags.
///
/// Two integer tags promote to the higher-ranked one. Otherwise any `F64`
/// operand gives `F64` and everything else gives `F32`, even when the other
/// operand is a 64-bit integer.
pub fn promote(a: TypeTag, b: TypeTag) -> TypeTag {
    if a.is_integer() && b.is_integer() {
        a.max(b)
    } else if a == TypeTag::F64 || b == TypeTag::F64 {
        TypeTag::F64
    } else {
        TypeTag::F32
    }
}

/// Apply `op` to two popped operands, returning `item2 <op> item1` in the
/// promoted type.
pub fn apply(op: ArithOp, item1: &Value, item2: &Value) -> EvalResult<Value> {
    for item in [item1, item2] {
        if !item.is_number() {
            return Err(EvalError::TypeError(format!(
                "'{op}' expects numeric operands, found {}",
                item.tag()
            )));
        }
    }
    let tag = promote(item1.tag(), item2.tag());
    let lhs = item2.cast_to(tag)?;
    let rhs = item1.cast_to(tag)?;
    combine(op, lhs, rhs)
}

/// Integer ops wrap at the operand width.
macro_rules! int_arith {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithOp::Add => $a.wrapping_add($b),
            ArithOp::Sub => $a.wrapping_sub($b),
            ArithOp::Mul => $a.wrapping_mul($b),
            ArithOp::Div => {
                if $b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                $a.wrapping_div($b)
            }
        }
    };
}

macro_rules! float_arith {
    ($op:expr, $a:expr, $b:expr) => {
        match $op {
            ArithOp::Add => $a + $b,
            ArithOp::Sub => $a - $b,
            ArithOp::Mul => $a * $b,
            ArithOp::Div => $a / $b,
        }
    };
}

fn combine(op: ArithOp, lhs: Value, rhs: Value) -> EvalResult<Value> {
    let result = match (lhs, rhs) {
        (Value::I8(a), Value::I8(b)) => Value::I8(int_arith!(op, a, b)),
        (Value::I16(a), Value::I16(b)) => Value::I16(int_arith!(op, a, b)),
        (Value::I32(a), Value::I32(b)) => Value::I32(int_arith!(op, a, b)),
        (Value::I64(a), Value::I64(b)) => Value::I64(int_arith!(op, a, b)),
        (Value::U8(a), Value::U8(b)) => Value::U8(int_arith!(op, a, b)),
        (Value::U16(a), Value::U16(b)) => Value::U16(int_arith!(op, a, b)),
        (Value::U32(a), Value::U32(b)) => Value::U32(int_arith!(op, a, b)),
        (Value::U64(a), Value::U64(b)) => Value::U64(int_arith!(op, a, b)),
        (Value::F32(a), Value::F32(b)) => Value::F32(float_arith!(op, a, b)),
        (Value::F64(a), Value::F64(b)) => Value::F64(float_arith!(op, a, b)),
        (lhs, rhs) => {
            return Err(EvalError::TypeError(format!(
                "'{op}' cannot combine {} and {}",
                lhs.tag(),
                rhs.tag()
            )))
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tag: TypeTag) -> Value {
        Value::parse_literal(tag, "3").unwrap()
    }

    #[test]
    fn test_integer_pairs_promote_to_higher_rank() {
        for a in TypeTag::ALL.into_iter().filter(|t| t.is_integer()) {
            for b in TypeTag::ALL.into_iter().filter(|t| t.is_integer()) {
                let result = apply(ArithOp::Add, &sample(a), &sample(b)).unwrap();
                assert_eq!(result.tag(), a.max(b), "{a} + {b}");
            }
        }
    }

    #[test]
    fn test_any_f64_operand_gives_f64() {
        for other in TypeTag::ALL.into_iter().filter(|t| t.is_number()) {
            assert_eq!(promote(TypeTag::F64, other), TypeTag::F64);
            assert_eq!(promote(other, TypeTag::F64), TypeTag::F64);
        }
    }

    #[test]
    fn test_f32_without_f64_gives_f32() {
        for other in TypeTag::ALL
            .into_iter()
            .filter(|t| t.is_number() && *t != TypeTag::F64)
        {
            assert_eq!(promote(TypeTag::F32, other), TypeTag::F32);
            assert_eq!(promote(other, TypeTag::F32), TypeTag::F32);
        }
        let wide = apply(ArithOp::Add, &Value::I64(1), &Value::F32(0.5)).unwrap();
        assert_eq!(wide, Value::F32(1.5));
    }

    #[test]
    fn test_signed_and_unsigned_mix_uses_declaration_rank() {
        assert_eq!(promote(TypeTag::I64, TypeTag::U8), TypeTag::U8);
        let r = apply(ArithOp::Add, &Value::I64(300), &Value::U8(1)).unwrap();
        assert_eq!(r, Value::U8(45));
    }

    #[test]
    fn test_sub_and_div_use_second_popped_as_left_operand() {
        // item1 = top of stack (3), item2 = below it (10)
        let three = Value::I32(3);
        let ten = Value::I32(10);
        assert_eq!(apply(ArithOp::Sub, &three, &ten), Ok(Value::I32(7)));
        assert_eq!(apply(ArithOp::Div, &three, &ten), Ok(Value::I32(3)));
        let r = apply(ArithOp::Sub, &Value::F64(0.5), &Value::F64(2.0));
        assert_eq!(r, Ok(Value::F64(1.5)));
        let r = apply(ArithOp::Sub, &Value::U16(1), &Value::U16(4));
        assert_eq!(r, Ok(Value::U16(3)));
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let r = apply(ArithOp::Add, &Value::I8(1), &Value::I8(127));
        assert_eq!(r, Ok(Value::I8(-128)));
        let r = apply(ArithOp::Sub, &Value::U8(1), &Value::U8(0));
        assert_eq!(r, Ok(Value::U8(255)));
        let r = apply(ArithOp::Mul, &Value::U16(2), &Value::U16(40000));
        assert_eq!(r, Ok(Value::U16(14464)));
    }

    #[test]
    fn test_integer_division_by_zero() {
        let r = apply(ArithOp::Div, &Value::I32(0), &Value::I32(1));
        assert_eq!(r, Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_float_division_by_zero_is_infinite() {
        let r = apply(ArithOp::Div, &Value::F64(0.0), &Value::F64(1.0)).unwrap();
        assert_eq!(r, Value::F64(f64::INFINITY));
    }

    #[test]
    fn test_string_operand_is_type_error() {
        let r = apply(ArithOp::Add, &Value::String("1".into()), &Value::I32(1));
        assert!(matches!(r, Err(EvalError::TypeError(_))));
        let r = apply(ArithOp::Mul, &Value::I32(1), &Value::String("1".into()));
        assert!(matches!(r, Err(EvalError::TypeError(_))));
    }
}
