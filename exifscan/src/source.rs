//! Where the bytes come from.
//!
//! The decoders never open files or sockets themselves. Instead, the
//! [`MetadataParser`](crate::MetadataParser) asks a [`ByteSource`] for either
//! the whole buffer or a range of it.

use std::sync::Arc;

/// Something that can hand out bytes.
pub trait ByteSource {
    /// The total number of bytes available.
    fn len(&self) -> usize;

    /// Whether the source has no bytes at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads every byte.
    fn read_all(&self) -> Result<Vec<u8>, SourceError>;

    /// Reads the bytes in `[start, start + size)`.
    ///
    /// A range running past the end is cut short. A range starting past the
    /// end is an error.
    fn read_range(&self, start: usize, size: usize) -> Result<Vec<u8>, SourceError>;
}

impl ByteSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read_all(&self) -> Result<Vec<u8>, SourceError> {
        Ok(self.to_vec())
    }

    fn read_range(&self, start: usize, size: usize) -> Result<Vec<u8>, SourceError> {
        let len = <[u8]>::len(self);
        if start >= len {
            log::error!("Asked for a range starting at `{start}`, but the source is `{len}` bytes.");
            return Err(SourceError::RangeStartPastEnd { start, len });
        }

        let end = start.saturating_add(size).min(len);
        log::trace!("Reading source range `{start}..{end}`.");
        Ok(self[start..end].to_vec())
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read_all(&self) -> Result<Vec<u8>, SourceError> {
        self.as_slice().read_all()
    }

    fn read_range(&self, start: usize, size: usize) -> Result<Vec<u8>, SourceError> {
        self.as_slice().read_range(start, size)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read_all(&self) -> Result<Vec<u8>, SourceError> {
        (**self).read_all()
    }

    fn read_range(&self, start: usize, size: usize) -> Result<Vec<u8>, SourceError> {
        (**self).read_range(start, size)
    }
}

/// An error from a [`ByteSource`].
#[derive(Clone, Debug)]
pub enum SourceError {
    /// The requested range started at or after the end of the source.
    RangeStartPastEnd { start: usize, len: usize },

    /// Reading failed for some I/O reason.
    Io(
        // note: `Arc` allows us to impl `Clone`
        Arc<std::io::Error>,
    ),
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceError::RangeStartPastEnd { start, len } => write!(
                f,
                "Requested a byte range starting at `{start}`, but the source only has `{len}` bytes."
            ),
            SourceError::Io(e) => write!(f, "Failed to read from the byte source. err: {e}"),
        }
    }
}

impl core::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            SourceError::Io(e) => Some(e.as_ref()),
            SourceError::RangeStartPastEnd { .. } => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        SourceError::Io(value.into())
    }
}
