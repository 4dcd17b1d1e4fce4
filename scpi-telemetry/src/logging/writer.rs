//! Writers that mask sensitive data on its way out.

use std::io;

use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;

use crate::masking::SensitiveDataMasker;

/// Wraps a [`MakeWriter`] so every formatted event is masked before it is written.
///
/// The fmt layer formats a whole event into one buffer before writing it, so
/// a secret is never split across two writes.
#[derive(Debug, Clone)]
pub struct MaskingMakeWriter<M> {
    inner: M,
    masker: Option<SensitiveDataMasker>,
}

impl<M> MaskingMakeWriter<M> {
    /// Masks everything written through `inner`.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            masker: Some(SensitiveDataMasker::new()),
        }
    }

    /// Writes through `inner` untouched.
    pub fn passthrough(inner: M) -> Self {
        Self {
            inner,
            masker: None,
        }
    }
}

impl<'a, M> MakeWriter<'a> for MaskingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = MaskingWriter<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        MaskingWriter {
            inner: self.inner.make_writer(),
            masker: self.masker.as_ref(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        MaskingWriter {
            inner: self.inner.make_writer_for(meta),
            masker: self.masker.as_ref(),
        }
    }
}

/// Writer produced by [`MaskingMakeWriter`].
#[derive(Debug)]
pub struct MaskingWriter<'a, W> {
    inner: W,
    masker: Option<&'a SensitiveDataMasker>,
}

impl<'a, W> MaskingWriter<'a, W> {
    /// Creates a writer masking with `masker`.
    pub fn new(inner: W, masker: &'a SensitiveDataMasker) -> Self {
        Self {
            inner,
            masker: Some(masker),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> io::Write for MaskingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match (self.masker, std::str::from_utf8(buf)) {
            (Some(masker), Ok(text)) => {
                self.inner.write_all(masker.mask_string(text).as_bytes())?;
            }
            _ => self.inner.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
