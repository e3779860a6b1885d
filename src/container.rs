//! Locating the physical shape record inside a resource file.
//!
//! Everything before the record's chunk id and everything after the record is carried as raw
//! bytes, so re-encoding an unmodified file reproduces it exactly.
use std::fs;
use std::io::Cursor;
use std::path::Path;
use crate::archive::{ArchiveReader, ArchiveWriter};
use crate::error::{Error, Result};
use crate::shape::{PhysicsShapeRecord, CHUNK_ID};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeFile {
    /// Bytes up to and including the chunk id.
    pub prefix: Vec<u8>,
    pub record: PhysicsShapeRecord,
    pub suffix: Vec<u8>,
}

impl ShapeFile {
    pub fn from_bytes(data: &[u8]) -> Result<ShapeFile> {
        let marker = CHUNK_ID.to_le_bytes();
        let start = data.windows(marker.len())
            .position(|w| w == marker)
            .ok_or(Error::ChunkNotFound { chunk_id: CHUNK_ID })?
            + marker.len();

        let mut ar = ArchiveReader::new(Cursor::new(&data[start..]));
        let mut record = PhysicsShapeRecord::default();
        record.archive(&mut ar)?;
        let end = start + ar.into_inner().position() as usize;
        tracing::debug!(
            "record v{} at {:#x}..{:#x} of {} bytes",
            record.version, start, end, data.len(),
        );

        Ok(ShapeFile {
            prefix: data[..start].to_vec(),
            record,
            suffix: data[end..].to_vec(),
        })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<ShapeFile> {
        let data = fs::read(path)?;
        ShapeFile::from_bytes(&data)
    }

    /// Encodes the whole file.  Takes `&mut self` because encoding runs through the same
    /// `archive` methods as decoding.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut ar = ArchiveWriter::new(self.prefix.clone());
        self.record.archive(&mut ar)?;
        let mut out = ar.into_inner();
        out.extend_from_slice(&self.suffix);
        Ok(out)
    }

    /// Encodes fully before touching `path`, so a failed encode leaves no partial file.
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
