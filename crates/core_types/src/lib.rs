/// Index of a node inside one tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Output encoding policy applied when a tree is rendered.
///
/// The mode only affects the byte-level encoding and the encoding declared
/// in the document prologue; it never changes the tree's logical content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NormalizeMode {
    /// UTF-8 bytes, no declared encoding.
    None,
    /// UTF-8 bytes, declared as `UTF-8`.
    #[default]
    Utf8,
    /// UTF-16LE bytes with a byte order mark, declared as `UTF-16`.
    Utf16,
}

impl NormalizeMode {
    pub fn declared_encoding(self) -> Option<&'static str> {
        match self {
            NormalizeMode::None => None,
            NormalizeMode::Utf8 => Some("UTF-8"),
            NormalizeMode::Utf16 => Some("UTF-16"),
        }
    }

    /// Whether the rendered bytes are valid UTF-8 (and so can be handed out as a `String`).
    pub fn is_utf8(self) -> bool {
        !matches!(self, NormalizeMode::Utf16)
    }
}
