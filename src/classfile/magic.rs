use std::fmt;

use speedy::{Context, Readable, Reader, Writable, Writer};

use crate::classfile::validity::Validity;

/// Four leading bytes of a container. Read and written byte by byte, so the
/// value does not depend on the endianness of the speedy context.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Magic {
  pub magic: [u8; 4],
}

impl Magic {
  pub const CLASS_FILE: Self = Self {
    magic: [0xCA, 0xFE, 0xBA, 0xBE],
  };

  pub fn as_bytes(&self) -> [u8; 4] {
    self.magic
  }
}

impl Default for Magic {
  fn default() -> Self {
    Self::CLASS_FILE
  }
}

impl Validity for Magic {
  fn valid(&self) -> bool {
    *self == Self::CLASS_FILE
  }
}

impl fmt::Debug for Magic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      Self::CLASS_FILE => write!(f, "CLASS_FILE"),
      other => write!(f, "{:02X?}", other.magic),
    }
  }
}

impl<'a, C: Context> Readable<'a, C> for Magic {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let mut magic = Self::default();
    for i in 0..magic.magic.len() {
      magic.magic[i] = reader.read_u8()?;
    }
    Ok(magic)
  }

  #[inline]
  fn minimum_bytes_needed() -> usize {
    std::mem::size_of::<Self>()
  }
}

impl<C: Context> Writable<C> for Magic {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    for elem in &self.magic {
      writer.write_u8(*elem)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use speedy::Endianness;

  use super::*;

  #[test]
  fn validity() {
    assert!(Magic::CLASS_FILE.valid());
    let magic = Magic {
      magic: [0xBE, 0xBA, 0xFE, 0xCA],
    };
    assert!(!magic.valid());
  }

  #[test]
  fn minimum_bytes_needed() {
    assert_eq!(4, <Magic as Readable<Endianness>>::minimum_bytes_needed());
  }

  #[test]
  fn debug_names_class_file_magic() {
    assert_eq!("CLASS_FILE", format!("{:?}", Magic::CLASS_FILE));
    let zero = Magic { magic: [0; 4] };
    assert_eq!("[00, 00, 00, 00]", format!("{zero:?}"));
  }

  #[test]
  fn endianness_does_not_matter() {
    let bytes: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];
    let le = Magic::read_from_buffer_with_ctx(Endianness::LittleEndian, &bytes).unwrap();
    let be = Magic::read_from_buffer_with_ctx(Endianness::BigEndian, &bytes).unwrap();
    assert_eq!(le, be);
    assert_eq!(Magic::CLASS_FILE, le);
  }

  serialization_test!( type = Magic,
  {
      class_file,
      Magic::CLASS_FILE,
      be = [0xCA, 0xFE, 0xBA, 0xBE]
  },
  {
      all_zero,
      Magic { magic: [0x00, 0x00, 0x00, 0x00] },
      be = [0x00, 0x00, 0x00, 0x00]
  });
}
