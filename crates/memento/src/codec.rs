use crate::error::{EncodeError, LoadError, ParseError};
use crate::node::Memento;
use core_types::NormalizeMode;
use std::io::Read;

/// A textual backing format for memento trees.
///
/// Implementors only deal in text: byte-order marks, charset detection and
/// the final byte encoding are handled by the provided methods, so every
/// format gets the same [`NormalizeMode`] behavior.
///
/// Implementations must not keep state between calls.
pub trait TreeCodec {
    /// Build a new tree from a complete document.
    ///
    /// Must either return a fully built root or an error; never a partial tree.
    fn parse_text(&self, text: &str) -> Result<Memento, ParseError>;

    /// Render the subtree at `root`, declaring the encoding `mode` selects.
    ///
    /// `root` need not be the root of its tree.
    fn render_text(&self, root: &Memento, mode: NormalizeMode) -> Result<String, EncodeError>;

    /// Detect the document's encoding, decode it strictly and parse it.
    fn parse(&self, input: &[u8]) -> Result<Memento, ParseError> {
        let text = tools::decode_document(input)?;
        self.parse_text(&text)
    }

    /// Read `reader` to the end, then [`parse`](Self::parse) it.
    fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Memento, LoadError>
    where
        Self: Sized,
    {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(LoadError::Stream)?;
        Ok(self.parse(&bytes)?)
    }

    /// Render and encode into the bytes `mode` selects.
    fn render(&self, root: &Memento, mode: NormalizeMode) -> Result<Vec<u8>, EncodeError> {
        let text = self.render_text(root, mode)?;
        Ok(tools::encode_document(text, mode))
    }
}
