use std::fmt;

use crate::error::BindError;

/// Target type of a positional argument or a kwarg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    String,
    Integer,
    Float,
}

impl Ty {
    /// Converts a literal taken from the command line into a typed value.
    ///
    /// Integers must be base-10 `i64` literals and floats must be finite
    /// decimal literals. Nothing is rounded or truncated: `2.5` is not an
    /// integer.
    pub fn coerce(self, literal: &str) -> Result<Value, BindError> {
        let err = || BindError::Coercion { literal: literal.to_string(), ty: self };
        let res = match self {
            Ty::String => Value::Str(literal.to_string()),
            Ty::Integer => Value::Int(literal.parse::<i64>().map_err(|_| err())?),
            Ty::Float => {
                let it = literal.parse::<f64>().map_err(|_| err())?;
                if !it.is_finite() {
                    return Err(err());
                }
                Value::Float(it)
            }
        };
        Ok(res)
    }

    pub(crate) fn admits(self, value: &Value) -> bool {
        value.ty() == self
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ty::String => "string",
            Ty::Integer => "integer",
            Ty::Float => "float",
        };
        f.write_str(name)
    }
}

/// A typed value produced by binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn ty(&self) -> Ty {
        match self {
            Value::Str(_) => Ty::String,
            Value::Int(_) => Ty::Integer,
            Value::Float(_) => Ty::Float,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(it) => Some(it.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(it) => Some(*it),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(it) => Some(*it),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(it) => fmt::Display::fmt(it, f),
            Value::Int(it) => fmt::Display::fmt(it, f),
            Value::Float(it) => fmt::Display::fmt(it, f),
        }
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Value {
        Value::Str(it.to_string())
    }
}

impl From<String> for Value {
    fn from(it: String) -> Value {
        Value::Str(it)
    }
}

impl From<i64> for Value {
    fn from(it: i64) -> Value {
        Value::Int(it)
    }
}

impl From<f64> for Value {
    fn from(it: f64) -> Value {
        Value::Float(it)
    }
}
