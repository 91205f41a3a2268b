use byteorder::{BigEndian, ByteOrder};
use speedy::{Endianness, Readable, Writable};

use crate::{
  classfile::{class_version::ClassVersion, magic::Magic, validity::Validity},
  error::{Error, Result},
};

/// Bytes taken by magic, minor and major version.
pub const HEADER_LENGTH: usize = 8;

/// Offset of the big-endian major version within the header.
pub const MAJOR_VERSION_OFFSET: usize = 6;

#[derive(Debug, Readable, Writable, PartialEq, Eq, Clone, Copy)]
pub struct Header {
  pub magic: Magic,
  pub version: ClassVersion,
}

impl Header {
  pub fn new(version: ClassVersion) -> Header {
    Header {
      magic: Magic::CLASS_FILE,
      version,
    }
  }

  pub fn major_version(&self) -> u16 {
    self.version.major
  }

  pub fn minor_version(&self) -> u16 {
    self.version.minor
  }

  /// Fixed-layout encoding: magic, then minor and major version big-endian.
  pub fn to_bytes(&self) -> [u8; HEADER_LENGTH] {
    let mut bytes = [0u8; HEADER_LENGTH];
    bytes[..4].copy_from_slice(&self.magic.as_bytes());
    BigEndian::write_u16(&mut bytes[4..MAJOR_VERSION_OFFSET], self.version.minor);
    BigEndian::write_u16(&mut bytes[MAJOR_VERSION_OFFSET..], self.version.major);
    bytes
  }

  pub fn with_major_version(self, major: u16) -> Header {
    Header {
      version: ClassVersion { major, ..self.version },
      ..self
    }
  }
}

impl Validity for Header {
  fn valid(&self) -> bool {
    self.magic.valid()
  }
}

/// Reads the fixed header at the start of `bytes`.
///
/// Returns the header together with the offset where the trailer starts,
/// which is always [`HEADER_LENGTH`].
pub fn parse_header(bytes: &[u8]) -> Result<(Header, usize)> {
  if bytes.len() < HEADER_LENGTH {
    return Error::invalid_format(&format!(
      "{} bytes is too short for a {HEADER_LENGTH} byte header",
      bytes.len()
    ));
  }
  let header = Header::read_from_buffer_with_ctx(Endianness::BigEndian, &bytes[..HEADER_LENGTH])
    .map_err(|e| Error::InvalidFormat {
      reason: e.to_string(),
    })?;
  if !header.valid() {
    return Error::invalid_format(&format!("bad magic {:?}", header.magic));
  }
  Ok((header, HEADER_LENGTH))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_java_8_header() {
    let bytes: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34, 0x00, 0x1F];
    let (header, trailer_offset) = parse_header(bytes).unwrap();
    assert_eq!(Header::new(ClassVersion::V1_8), header);
    assert_eq!(52, header.major_version());
    assert_eq!(0, header.minor_version());
    assert_eq!(HEADER_LENGTH, trailer_offset);
  }

  #[test]
  fn parse_header_only() {
    let bytes: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x03, 0x00, 0x2D];
    let (header, trailer_offset) = parse_header(bytes).unwrap();
    assert_eq!(ClassVersion::V1_1, header.version);
    assert_eq!(bytes.len(), trailer_offset);
  }

  #[test]
  fn reject_short_input() {
    let err = parse_header(&[0x00, 0x00, 0x00, 0x00]).unwrap_err();
    assert!(err.is_invalid_format());
    let err = parse_header(&[0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00]).unwrap_err();
    assert!(err.is_invalid_format());
    assert!(parse_header(&[]).unwrap_err().is_invalid_format());
  }

  #[test]
  fn reject_bad_magic() {
    let bytes: &[u8] = &[0xCA, 0xFE, 0xD0, 0x0D, 0x00, 0x00, 0x00, 0x34];
    let err = parse_header(bytes).unwrap_err();
    assert!(err.is_invalid_format());
    assert!(err.to_string().contains("bad magic"));
  }

  #[test]
  fn replace_major_version_keeps_minor() {
    let header = Header::new(ClassVersion::new(52, 7)).with_major_version(49);
    assert_eq!(ClassVersion::new(49, 7), header.version);
    assert!(header.valid());
  }

  #[test]
  fn major_version_offset_matches_layout() {
    let bytes = Header::new(ClassVersion::new(0x1234, 0))
      .write_to_vec_with_ctx(Endianness::BigEndian)
      .unwrap();
    assert_eq!(HEADER_LENGTH, bytes.len());
    assert_eq!(
      &[0x12u8, 0x34][..],
      &bytes[MAJOR_VERSION_OFFSET..MAJOR_VERSION_OFFSET + 2]
    );
  }

  #[test]
  fn to_bytes_matches_codec() {
    for version in [ClassVersion::V1_1, ClassVersion::V1_8, ClassVersion::new(65, 0xFFFF)] {
      let header = Header::new(version);
      let encoded = header.write_to_vec_with_ctx(Endianness::BigEndian).unwrap();
      assert_eq!(&encoded[..], &header.to_bytes()[..]);
      assert_eq!((header, HEADER_LENGTH), parse_header(&header.to_bytes()).unwrap());
    }
  }

  serialization_test!( type = Header,
  {
      header_java_8,
      Header::new(ClassVersion::V1_8),
      be = [0xCA, 0xFE, 0xBA, 0xBE, // magic
            0x00, 0x00,             // minor_version
            0x00, 0x34]             // major_version
  },
  {
      header_java_1_5,
      Header::new(ClassVersion::V1_5),
      be = [0xCA, 0xFE, 0xBA, 0xBE,
            0x00, 0x00,
            0x00, 0x31]
  });
}
