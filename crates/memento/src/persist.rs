//! Loading and saving trees through any [`TreeCodec`].
//!
//! File operations keep the handle scoped to the call: it is closed on every
//! path out, including failures. Saves render the whole document first, write
//! it to a temporary file beside the target and then rename it into place, so
//! a failed save of any kind leaves an existing file as it was.
use crate::codec::TreeCodec;
use crate::error::{EncodeError, LoadError, ParseError, SaveError};
use crate::node::Memento;
use core_types::NormalizeMode;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub fn load_from_str<C: TreeCodec + ?Sized>(
    codec: &C,
    text: &str,
) -> Result<Memento, ParseError> {
    codec.parse_text(text)
}

pub fn load_from_bytes<C: TreeCodec + ?Sized>(
    codec: &C,
    bytes: &[u8],
) -> Result<Memento, ParseError> {
    codec.parse(bytes)
}

pub fn load_from_file<C: TreeCodec + ?Sized>(
    codec: &C,
    path: impl AsRef<Path>,
) -> Result<Memento, LoadError> {
    let path = path.as_ref();
    log::debug!(target: "memento.persist", "loading {}", path.display());

    let io_err = |source: io::Error| {
        log::warn!(target: "memento.persist", "failed to read {}: {source}", path.display());
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    };
    let bytes = {
        let mut file = File::open(path).map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;
        bytes
    };

    let root = codec.parse(&bytes)?;
    log::debug!(
        target: "memento.persist",
        "loaded {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(root)
}

impl Memento {
    /// Render this subtree as text.
    ///
    /// The text declares the encoding `mode` selects; with
    /// [`NormalizeMode::Utf16`] the declaration says `UTF-16` even though a
    /// Rust `String` is UTF-8, matching what [`save_to_file`](Self::save_to_file)
    /// would write once encoded.
    pub fn save_to_string<C: TreeCodec + ?Sized>(
        &self,
        codec: &C,
        mode: NormalizeMode,
    ) -> Result<String, EncodeError> {
        codec.render_text(self, mode)
    }

    pub fn save_to_bytes<C: TreeCodec + ?Sized>(
        &self,
        codec: &C,
        mode: NormalizeMode,
    ) -> Result<Vec<u8>, EncodeError> {
        codec.render(self, mode)
    }

    pub fn save_to_file<C: TreeCodec + ?Sized>(
        &self,
        codec: &C,
        path: impl AsRef<Path>,
        mode: NormalizeMode,
    ) -> Result<(), SaveError> {
        let path = path.as_ref();
        log::debug!(target: "memento.persist", "saving {} as {mode:?}", path.display());

        let bytes = codec.render(self, mode)?;

        let io_err = |source: io::Error| {
            log::warn!(target: "memento.persist", "failed to write {}: {source}", path.display());
            SaveError::Io {
                path: path.to_path_buf(),
                source,
            }
        };
        // The temporary file must share a filesystem with `path` to be renamed over it.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            writer.write_all(&bytes).map_err(io_err)?;
            // Flush explicitly: errors from the implicit flush on drop are lost.
            writer.flush().map_err(io_err)?;
        }
        temp.persist(path).map_err(|err| io_err(err.error))?;

        log::debug!(
            target: "memento.persist",
            "saved {} ({} bytes)",
            path.display(),
            bytes.len()
        );
        Ok(())
    }
}
