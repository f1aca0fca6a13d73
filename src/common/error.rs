use thiserror::Error;

/// Every error a core operation can report.
/// Errors carry rendered type names rather than `TypeId`s,
/// so they can be displayed without the `Universe` that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A value of one type was expected, but something else was found.
    #[error("type mismatch: expected <{expected}> but got <{got}>")]
    TypeMismatch { expected: String, got: String },

    /// An argument did not have the expected shape.
    #[error("expected argument of {expected} but got {got}")]
    InvalidArgument { expected: String, got: String },

    #[error("unsupported operand types: cannot '{op}' <{left}> with <{right}>")]
    BinaryOperationUnsupported {
        op: String,
        left: String,
        right: String,
    },

    /// A typed token was expected, but raw input was supplied.
    #[error("expected token of a type, but got {0}")]
    ExpectedToken(String),

    /// The union of two functions is not well defined.
    #[error("invalid 'or' usage: {0}")]
    OrConstructorFailure(String),

    #[error("invalid attribute: product type <{ty}> has no attribute '{attr}'")]
    UndefinedAttribute { attr: String, ty: String },

    #[error("<{0}> is not callable")]
    Uncallable(String),

    /// Named types are immutable; a name can only be declared once.
    #[error("named type `{0}` is already defined")]
    AlreadyDefined(String),

    // Parser errors
    #[error("failed to match text delimiter: expected {expected:?} but got {got:?} at offset {offset}")]
    LiteralMismatch {
        expected: char,
        got: char,
        offset: usize,
    },

    #[error("unknown field name `{0}` in format string")]
    UnknownFieldName(String),

    #[error("unterminated field `{0}` in format string")]
    UnterminatedField(String),

    /// Records parsed with such a format could never be complete.
    #[error("format string has no slot for field `{0}`")]
    MissingField(String),

    #[error("unexpected end of input while matching {0}")]
    UnexpectedEnd(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        let error = Error::TypeMismatch {
            expected: "int".to_string(),
            got: "str".to_string(),
        };
        assert_eq!(error.to_string(), "type mismatch: expected <int> but got <str>");

        let error = Error::OrConstructorFailure("cannot 'or' curried-functions".to_string());
        assert_eq!(error.to_string(), "invalid 'or' usage: cannot 'or' curried-functions");

        let error = Error::LiteralMismatch { expected: ',', got: ';', offset: 4 };
        assert_eq!(
            error.to_string(),
            "failed to match text delimiter: expected ',' but got ';' at offset 4"
        );
    }
}
