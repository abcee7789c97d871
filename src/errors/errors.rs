use std::fmt::Display;

use inkwell::{builder::BuilderError, support::LLVMString};
use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Errors raised where no source position is known, e.g. inside LLVM.
    pub fn without_position(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Error::without_position(ErrorImpl::StructuralViolation {
            message: message.into(),
        })
    }

    /// A failure reported by LLVM itself.
    pub fn backend(message: impl Display) -> Self {
        Error::without_position(ErrorImpl::Backend {
            message: message.to_string(),
        })
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Attaches a position to an error that was raised without one.
    pub fn or_position(mut self, position: Option<Position>) -> Self {
        if self.position.is_null() {
            if let Some(position) = position {
                self.position = position;
            }
        }
        self
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::LookupFailure { .. } => "LookupFailure",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::StructuralViolation { .. } => "StructuralViolation",
            ErrorImpl::Backend { .. } => "Backend",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::LookupFailure { name } => ErrorTip::Suggestion(format!(
                "`{}` is not declared in this scope or any enclosing one",
                name
            )),
            ErrorImpl::AlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`, use an explicit cast such as `{}(...)`",
                expected, received, expected
            )),
            ErrorImpl::UnknownType { node } => ErrorTip::Suggestion(format!(
                "The type of {} is not known at this point",
                node
            )),
            ErrorImpl::ArgumentCountMismatch { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::StructuralViolation { .. } => ErrorTip::Suggestion(String::from(
                "This is an internal compiler error, the tree was not in the expected shape",
            )),
            ErrorImpl::Backend { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.position.is_null() {
            write!(f, "{}", self.internal_error)
        } else {
            write!(
                f,
                "{} (at {}:{})",
                self.internal_error, self.position.1, self.position.0
            )
        }
    }
}

impl std::error::Error for Error {}

impl From<BuilderError> for Error {
    fn from(error: BuilderError) -> Self {
        Error::backend(error)
    }
}

impl From<LLVMString> for Error {
    fn from(message: LLVMString) -> Self {
        Error::backend(message)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("name {name:?} could not be resolved")]
    LookupFailure { name: String },
    #[error("name {name:?} already declared")]
    AlreadyDeclared { name: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMismatch { expected: String, received: String },
    #[error("type of {node} is not known")]
    UnknownType { node: String },
    #[error("wrong number of arguments: expected {expected:?}, received {received:?}")]
    ArgumentCountMismatch { expected: usize, received: usize },
    #[error("malformed tree: {message}")]
    StructuralViolation { message: String },
    #[error("backend error: {message}")]
    Backend { message: String },
}
