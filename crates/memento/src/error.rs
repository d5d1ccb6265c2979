use std::io;
use std::path::PathBuf;
use tools::DecodeError;

/// The external representation could not be turned into a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset into the decoded text (or into the raw input for decode errors).
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl From<DecodeError> for ParseError {
    fn from(err: DecodeError) -> Self {
        let offset = match err {
            DecodeError::InvalidUtf8 { valid_up_to } => valid_up_to,
            DecodeError::InvalidUtf16 { offset } => offset,
            DecodeError::OddUtf16Length => 0,
        };
        ParseError::new(ParseErrorKind::Decode(err), offset)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("undecodable input: {0}")]
    Decode(DecodeError),
    #[error("unexpected end of input inside {0}")]
    UnexpectedEof(&'static str),
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("invalid or missing name")]
    InvalidName,
    #[error("expected `=` after attribute `{0}`")]
    MissingEquals(String),
    #[error("value of attribute `{0}` is not quoted")]
    UnquotedAttribute(String),
    #[error("`<` is not allowed in the value of attribute `{0}`")]
    LtInAttribute(String),
    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),
    #[error("end tag `{found}` does not match open element `{expected}`")]
    MismatchedEndTag { expected: String, found: String },
    #[error("end tag `{0}` has no open element")]
    UnexpectedEndTag(String),
    #[error("element `{0}` is never closed")]
    UnclosedElement(String),
    #[error("text outside the root element")]
    TextOutsideRoot,
    #[error("more than one root element")]
    MultipleRoots,
    #[error("document has no root element")]
    NoRootElement,
    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("too many distinct names")]
    TooManyNames,
    #[error("document type declaration after the root element")]
    MisplacedDoctype,
    #[error("`]]>` is not allowed in character data")]
    CdataEndInText,
}

/// The tree cannot be written in the requested form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("`{0}` is not a valid element or attribute name")]
    InvalidName(String),
    #[error("character U+{code:04X} cannot appear in the output document")]
    InvalidCharacter { code: u32 },
    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read input stream")]
    Stream(#[source] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
