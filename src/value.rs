//! Argument values carried by records.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
	match self {
	    Value::Number(n) => Some(*n),
	    _ => None,
	}
    }

    pub fn as_str(&self) -> Option<&str> {
	match self {
	    Value::Text(s) => Some(s),
	    _ => None,
	}
    }

    ///Truthiness the way a drawing surface reads a flag argument.
    pub fn is_truthy(&self) -> bool {
	match self {
	    Value::Number(n) => *n != 0.0 && !n.is_nan(),
	    Value::Bool(b) => *b,
	    Value::Text(s) => !s.is_empty(),
	}
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self { Value::Number(n as f64) }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self { Value::Number(n as f64) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(String::from(s)) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    Value::Number(n) => write!(f, "{}", n),
	    Value::Bool(b) => write!(f, "{}", b),
	    Value::Text(s) => f.write_str(s),
	}
    }
}
