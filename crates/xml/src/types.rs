use crate::atom::{AtomId, AtomTable};

/// Markup events that shape the tree.
///
/// Comments, processing instructions, the XML declaration and any DOCTYPE are
/// consumed by the tokenizer and never reach the tree builder. `offset` is the
/// byte position of the token in the decoded input.
#[derive(Debug)]
pub enum Token {
    StartTag {
        name: AtomId,
        attributes: Vec<(AtomId, String)>,
        self_closing: bool,
        offset: usize,
    },
    EndTag {
        name: AtomId,
        offset: usize,
    },
    /// Character data after entity decoding and end-of-line normalization.
    ///
    /// `ignorable` is set when the raw source was nothing but whitespace;
    /// CDATA sections are never ignorable.
    Text {
        text: String,
        ignorable: bool,
        offset: usize,
    },
}

impl Token {
    pub fn offset(&self) -> usize {
        match self {
            Token::StartTag { offset, .. }
            | Token::EndTag { offset, .. }
            | Token::Text { offset, .. } => *offset,
        }
    }
}

#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    atoms: AtomTable,
    /// Length of the input, where end-of-input errors are reported.
    end: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, atoms: AtomTable, end: usize) -> Self {
        Self { tokens, atoms, end }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}
