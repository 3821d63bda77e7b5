//! Type system definitions for the AST.
//!
//! `DataType` is the single structural description of a type, used both for
//! annotations written by the parser and for the types the type checker
//! resolves onto expressions.

use std::fmt::Display;

/// Precision of a floating point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatType {
    Single,
    Double,
}

#[derive(Debug, Clone)]
pub enum DataType {
    Int { width: u8, signed: bool },
    Float(FloatType),
    Bool,
    String,
    Null,
    Array(Box<DataType>),
    /// A hotpot, referenced by name.
    Record(String),
    Function {
        params: Vec<DataType>,
        returns: Box<DataType>,
    },
    /// Placeholder until the type checker resolves a type.
    Unresolved,
}

/// Names that refer to primitive types and can never name a hotpot.
pub const BUILTIN_TYPE_NAMES: [&str; 6] = ["int", "float", "double", "null", "string", "bool"];

impl DataType {
    pub fn int64() -> Self {
        DataType::Int {
            width: 64,
            signed: true,
        }
    }

    pub fn double() -> Self {
        DataType::Float(FloatType::Double)
    }

    pub fn array_of(element: DataType) -> Self {
        DataType::Array(Box::new(element))
    }

    /// Maps a written type name onto a type. Unknown names are assumed to be hotpots.
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" => DataType::int64(),
            "float" => DataType::Float(FloatType::Single),
            "double" => DataType::double(),
            "bool" => DataType::Bool,
            "string" => DataType::String,
            "null" | "void" => DataType::Null,
            _ => DataType::Record(name.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataType::Null)
    }

    pub fn record_name(&self) -> Option<&str> {
        match self {
            DataType::Record(name) => Some(name),
            _ => None,
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataType::Array(left), DataType::Array(right)) => left == right,
            (DataType::Record(left), DataType::Record(right)) => left == right,
            (
                DataType::Function {
                    params: left_params,
                    returns: left_returns,
                },
                DataType::Function {
                    params: right_params,
                    returns: right_returns,
                },
            ) => left_params == right_params && left_returns == right_returns,
            // Integer width and float precision do not take part in equality.
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for DataType {}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Int {
                width: 64,
                signed: true,
            } => write!(f, "int"),
            DataType::Int { width, signed } => {
                write!(f, "{}{}", if *signed { "i" } else { "u" }, width)
            }
            DataType::Float(FloatType::Single) => write!(f, "float"),
            DataType::Float(FloatType::Double) => write!(f, "double"),
            DataType::Bool => write!(f, "bool"),
            DataType::String => write!(f, "string"),
            DataType::Null => write!(f, "null"),
            DataType::Array(element) => write!(f, "[{}]", element),
            DataType::Record(name) => write!(f, "{}", name),
            DataType::Function { params, returns } => {
                let params = params
                    .iter()
                    .map(|param| param.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "def({}) -> {}", params, returns)
            }
            DataType::Unresolved => write!(f, "<unresolved>"),
        }
    }
}
