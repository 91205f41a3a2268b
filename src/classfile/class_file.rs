use bytes::{BufMut, Bytes, BytesMut};

use crate::{
  classfile::header::{parse_header, Header, HEADER_LENGTH},
  error::Result,
};

/// A class file split into its parsed header and the opaque remainder.
///
/// The trailer shares storage with the buffer the value was built from, so
/// deriving a new `ClassFile` with a different header does not copy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
  header: Header,
  trailer: Bytes,
}

impl ClassFile {
  pub fn from_bytes(buffer: Bytes) -> Result<ClassFile> {
    let (header, trailer_offset) = parse_header(&buffer)?;
    Ok(ClassFile {
      header,
      trailer: buffer.slice(trailer_offset..),
    })
  }

  pub fn header(&self) -> &Header {
    &self.header
  }

  pub fn trailer(&self) -> &Bytes {
    &self.trailer
  }

  pub fn encoded_len(&self) -> usize {
    HEADER_LENGTH + self.trailer.len()
  }

  pub fn with_major_version(&self, major: u16) -> ClassFile {
    ClassFile {
      header: self.header.with_major_version(major),
      trailer: self.trailer.clone(),
    }
  }

  pub fn to_bytes(&self) -> Bytes {
    let mut buffer = BytesMut::with_capacity(self.encoded_len());
    buffer.put_slice(&self.header.to_bytes());
    buffer.put_slice(&self.trailer);
    buffer.freeze()
  }
}
