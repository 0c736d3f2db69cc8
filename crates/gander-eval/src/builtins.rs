//! Built-in callables: `concat`, `stdout`, `endl`, `stdin`.
//!
//! These names are routed by `call` before the function table is consulted,
//! so a user-defined function can never shadow them.

use crate::error::{EvalError, EvalResult};
use crate::stack::OperandStack;
use gander_types::Value;
use std::io::BufRead;

/// A callable handled directly by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Pop a count N, pop N values, push their renderings joined in push order.
    Concat,
    /// Pop a value and write its rendering, without a line break.
    Stdout,
    /// Write a line break.
    Endl,
    /// Read one line and push it as a string.
    Stdin,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "concat" => Some(Self::Concat),
            "stdout" => Some(Self::Stdout),
            "endl" => Some(Self::Endl),
            "stdin" => Some(Self::Stdin),
            _ => None,
        }
    }
}

/// Pop the count and the values for `concat`; the first value popped ends
/// up last in the result.
pub(crate) fn concat(stack: &mut OperandStack) -> EvalResult<Value> {
    let count_value = stack.pop()?;
    let count = count_value.as_integer().ok_or_else(|| {
        EvalError::TypeError(format!(
            "concat count must be an integer, found {}",
            count_value.tag()
        ))
    })?;
    let count = usize::try_from(count).map_err(|_| {
        EvalError::TypeError(format!("concat count must not be negative, found {count}"))
    })?;

    let mut text = String::new();
    for _ in 0..count {
        let part = stack.pop()?;
        text.insert_str(0, &part.to_string());
    }
    Ok(Value::String(text))
}

/// Read one line, without its terminator.
pub(crate) fn read_line<R: BufRead + ?Sized>(input: &mut R) -> EvalResult<Value> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(EvalError::EndOfInput);
    }
    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);
    Ok(Value::String(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stack_of(values: Vec<Value>) -> OperandStack {
        let mut stack = OperandStack::new();
        for v in values {
            stack.push(v);
        }
        stack
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(Builtin::from_name("concat"), Some(Builtin::Concat));
        assert_eq!(Builtin::from_name("stdin"), Some(Builtin::Stdin));
        assert_eq!(Builtin::from_name("Stdout"), None);
        assert_eq!(Builtin::from_name("prompt"), None);
    }

    #[test]
    fn test_concat_keeps_push_order() {
        let mut stack = stack_of(vec![
            Value::String("a".into()),
            Value::String("b".into()),
            Value::String("c".into()),
            Value::I32(3),
        ]);
        assert_eq!(concat(&mut stack), Ok(Value::String("abc".into())));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_concat_renders_numbers_and_leaves_rest() {
        let mut stack = stack_of(vec![
            Value::String("keep".into()),
            Value::String("n=".into()),
            Value::F64(2.5),
            Value::U8(2),
        ]);
        assert_eq!(concat(&mut stack), Ok(Value::String("n=2.5".into())));
        assert_eq!(stack.as_slice(), &[Value::String("keep".into())]);
    }

    #[test]
    fn test_concat_zero_count_is_empty_string() {
        let mut stack = stack_of(vec![Value::I64(0)]);
        assert_eq!(concat(&mut stack), Ok(Value::String(String::new())));
    }

    #[test]
    fn test_concat_rejects_bad_counts() {
        let mut stack = stack_of(vec![Value::F32(1.0)]);
        assert!(matches!(concat(&mut stack), Err(EvalError::TypeError(_))));
        let mut stack = stack_of(vec![Value::I8(-1)]);
        assert!(matches!(concat(&mut stack), Err(EvalError::TypeError(_))));
        let mut stack = stack_of(vec![Value::I32(2)]);
        assert_eq!(concat(&mut stack), Err(EvalError::StackUnderflow));
    }

    #[test]
    fn test_read_line_strips_terminator() {
        let mut input = Cursor::new("yes\r\nno\nlast");
        assert_eq!(read_line(&mut input), Ok(Value::String("yes".into())));
        assert_eq!(read_line(&mut input), Ok(Value::String("no".into())));
        assert_eq!(read_line(&mut input), Ok(Value::String("last".into())));
        assert_eq!(read_line(&mut input), Err(EvalError::EndOfInput));
    }
}
