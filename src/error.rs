use thiserror::Error;

use crate::value::{Ty, Value};

/// The line could not be turned into a [`Tree`](crate::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected a command, got an empty line")]
    EmptyInput,
    #[error("expected a command name, got `{found}`")]
    MissingName { found: String },
    #[error("unterminated quote: `{quote}` in `{text}` is never closed")]
    UnterminatedQuote { quote: char, text: String },
    #[error("unexpected input: `{rest}`")]
    UnexpectedInput { rest: String },
}

/// A parsed tree does not fit the contract of the command it was bound to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("unknown command: `{name}`. Use `help` for more information")]
    UnknownCommand { name: String },
    #[error("`{flag}` is not a valid flag of command `{command}`")]
    InvalidFlag { flag: char, command: String },
    #[error("`{key}` is not a valid kwarg of command `{command}`")]
    InvalidKwarg { key: String, command: String },
    #[error("duplicate kwarg: `--{key}`")]
    DuplicateKwarg { key: String },
    #[error("kwarg `--{key}` expects a value of type {ty}")]
    MissingKwargValue { key: String, ty: Ty },
    #[error("missing required kwarg: `--{key}`")]
    MissingKwarg { key: String },
    #[error("`{literal}` can not be converted to type {ty}")]
    Coercion { literal: String, ty: Ty },
    #[error("too many arguments: expected {expected}, got {got}")]
    TooManyArguments { expected: usize, got: usize },
    #[error("too few arguments: expected {expected}, got {got}")]
    TooFewArguments { expected: usize, got: usize },
    #[error("unexpected `{found}` in arguments of command `{command}`")]
    UnexpectedNode { found: String, command: String },
    #[error("a subcommand of `{command}` is required. Use `help` for more information")]
    SubcommandRequired { command: String },
    #[error("command `{command}` has nothing to run")]
    NoHandler { command: String },
    #[error("{}", frame(.command, .inner))]
    Nested { command: String, inner: Box<BindError> },
}

impl BindError {
    /// Wraps `self` into a `Command: <command> { ... }` frame.
    pub fn nest(self, command: &str) -> BindError {
        BindError::Nested { command: command.to_string(), inner: Box::new(self) }
    }

    /// The innermost error, with all dispatch frames stripped.
    pub fn innermost(&self) -> &BindError {
        match self {
            BindError::Nested { inner, .. } => inner.innermost(),
            it => it,
        }
    }
}

fn frame(command: &str, inner: &BindError) -> String {
    let mut buf = format!("Command: {command} {{\n");
    for line in inner.to_string().lines() {
        if line.is_empty() {
            buf.push('\n');
        } else {
            buf.push_str("    ");
            buf.push_str(line);
            buf.push('\n');
        }
    }
    buf.push('}');
    buf
}

/// A command declaration violates the rules checked at registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("invalid command name: `{name}`")]
    InvalidName { name: String },
    #[error("required argument `{arg}` of `{command}` follows an optional one")]
    RequiredAfterOptional { command: String, arg: String },
    #[error("default of `{name}` in `{command}` must be of type {ty}, got `{value}`")]
    DefaultTypeMismatch { command: String, name: String, ty: Ty, value: Value },
    #[error("flag name must be one alphanumeric character, got `{flag}` in `{command}`")]
    InvalidFlag { command: String, flag: char },
    #[error("flag `-{flag}` of `{command}` declared more than once")]
    DuplicateFlag { command: String, flag: char },
    #[error("invalid kwarg key `{key}` in `{command}`")]
    InvalidKey { command: String, key: String },
    #[error("kwarg `--{key}` of `{command}` declared more than once")]
    DuplicateKwarg { command: String, key: String },
    #[error("`--help` kwarg is generated automatically")]
    ReservedKwarg { command: String },
    #[error("command `{name}` declared more than once")]
    DuplicateCommand { name: String },
}
