use std::{cmp::Ordering, fmt};

use speedy::{Readable, Writable};

/// Version fields of a class file header. On the wire `minor` precedes
/// `major`, both big-endian `u16`. Ordering compares `major` first.
#[derive(Debug, PartialEq, Eq, Hash, Readable, Writable, Clone, Copy)]
pub struct ClassVersion {
  pub minor: u16,
  pub major: u16,
}

impl ClassVersion {
  pub const V1_1: ClassVersion = ClassVersion { minor: 3, major: 45 };
  pub const V1_2: ClassVersion = ClassVersion { minor: 0, major: 46 };
  pub const V1_3: ClassVersion = ClassVersion { minor: 0, major: 47 };
  pub const V1_4: ClassVersion = ClassVersion { minor: 0, major: 48 };
  pub const V1_5: ClassVersion = ClassVersion { minor: 0, major: 49 };
  pub const V1_6: ClassVersion = ClassVersion { minor: 0, major: 50 };
  pub const V1_7: ClassVersion = ClassVersion { minor: 0, major: 51 };
  pub const V1_8: ClassVersion = ClassVersion { minor: 0, major: 52 };
  pub const V9: ClassVersion = ClassVersion { minor: 0, major: 53 };
  pub const V10: ClassVersion = ClassVersion { minor: 0, major: 54 };
  pub const V11: ClassVersion = ClassVersion { minor: 0, major: 55 };
  pub const V12: ClassVersion = ClassVersion { minor: 0, major: 56 };
  pub const V13: ClassVersion = ClassVersion { minor: 0, major: 57 };
  pub const V14: ClassVersion = ClassVersion { minor: 0, major: 58 };
  pub const V15: ClassVersion = ClassVersion { minor: 0, major: 59 };
  pub const V16: ClassVersion = ClassVersion { minor: 0, major: 60 };
  pub const V17: ClassVersion = ClassVersion { minor: 0, major: 61 };
  pub const V18: ClassVersion = ClassVersion { minor: 0, major: 62 };
  pub const V19: ClassVersion = ClassVersion { minor: 0, major: 63 };
  pub const V20: ClassVersion = ClassVersion { minor: 0, major: 64 };
  pub const V21: ClassVersion = ClassVersion { minor: 0, major: 65 };
  pub const V22: ClassVersion = ClassVersion { minor: 0, major: 66 };
  pub const V23: ClassVersion = ClassVersion { minor: 0, major: 67 };
  pub const V24: ClassVersion = ClassVersion { minor: 0, major: 68 };
  pub const V25: ClassVersion = ClassVersion { minor: 0, major: 69 };

  pub const LATEST: ClassVersion = ClassVersion::V25;

  /// Target used when the caller does not pick one.
  pub const DEFAULT_TARGET: ClassVersion = ClassVersion::V1_5;

  // Feature releases 2..=8 were called "1.N"; the major number is always
  // release + 44 from 1.2 onwards.
  const MAJOR_OFFSET: u16 = 44;

  pub fn new(major: u16, minor: u16) -> Self {
    Self { minor, major }
  }

  /// Release that introduced this major version, e.g. `"Java 1.5"` or
  /// `"Java 17"`.
  pub fn release_name(&self) -> Option<String> {
    match self.major {
      45 => Some("Java 1.1".to_string()),
      46..=52 => Some(format!("Java 1.{}", self.major - Self::MAJOR_OFFSET)),
      m if (53..=Self::LATEST.major).contains(&m) => {
        Some(format!("Java {}", m - Self::MAJOR_OFFSET))
      }
      _ => None,
    }
  }

  /// Parses a Java release name such as `1.5`, `5`, `1.8`, `8` or `21`.
  pub fn from_release(release: &str) -> Option<Self> {
    let release = release.trim();
    let feature = match release.strip_prefix("1.") {
      Some(legacy) => {
        let n: u16 = legacy.parse().ok()?;
        if !(1..=8).contains(&n) {
          return None;
        }
        n
      }
      None => {
        let n: u16 = release.parse().ok()?;
        if !(5..=Self::LATEST.major - Self::MAJOR_OFFSET).contains(&n) {
          return None;
        }
        n
      }
    };
    if feature == 1 {
      Some(Self::V1_1)
    } else {
      Some(Self::new(feature + Self::MAJOR_OFFSET, 0))
    }
  }
}

impl Default for ClassVersion {
  fn default() -> Self {
    ClassVersion::DEFAULT_TARGET
  }
}

impl Ord for ClassVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .major
      .cmp(&other.major)
      .then(self.minor.cmp(&other.minor))
  }
}

impl PartialOrd for ClassVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for ClassVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.release_name() {
      Some(name) => write!(f, "{}.{} ({name})", self.major, self.minor),
      None => write!(f, "{}.{}", self.major, self.minor),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ordering_is_by_major_first() {
    assert!(ClassVersion::V1_1 < ClassVersion::V1_2);
    assert!(ClassVersion::new(49, 65535) < ClassVersion::new(50, 0));
    assert!(ClassVersion::new(52, 1) > ClassVersion::V1_8);
    assert!(ClassVersion::V1_5 < ClassVersion::LATEST);
  }

  #[test]
  fn release_names() {
    assert_eq!(Some("Java 1.1".to_string()), ClassVersion::V1_1.release_name());
    assert_eq!(Some("Java 1.5".to_string()), ClassVersion::V1_5.release_name());
    assert_eq!(Some("Java 1.8".to_string()), ClassVersion::V1_8.release_name());
    assert_eq!(Some("Java 9".to_string()), ClassVersion::V9.release_name());
    assert_eq!(Some("Java 17".to_string()), ClassVersion::V17.release_name());
    assert_eq!(None, ClassVersion::new(44, 0).release_name());
    assert_eq!(None, ClassVersion::new(70, 0).release_name());
  }

  #[test]
  fn parse_release_names() {
    assert_eq!(Some(ClassVersion::V1_1), ClassVersion::from_release("1.1"));
    assert_eq!(Some(ClassVersion::V1_5), ClassVersion::from_release("1.5"));
    assert_eq!(Some(ClassVersion::V1_5), ClassVersion::from_release("5"));
    assert_eq!(Some(ClassVersion::V1_8), ClassVersion::from_release(" 8 "));
    assert_eq!(Some(ClassVersion::V11), ClassVersion::from_release("11"));
    assert_eq!(Some(ClassVersion::V25), ClassVersion::from_release("25"));
  }

  #[test]
  fn reject_unknown_release_names() {
    assert_eq!(None, ClassVersion::from_release(""));
    assert_eq!(None, ClassVersion::from_release("1.9"));
    assert_eq!(None, ClassVersion::from_release("1.0"));
    assert_eq!(None, ClassVersion::from_release("4"));
    assert_eq!(None, ClassVersion::from_release("26"));
    assert_eq!(None, ClassVersion::from_release("java8"));
    assert_eq!(None, ClassVersion::from_release("49"));
  }

  #[test]
  fn display_includes_release() {
    assert_eq!("49.0 (Java 1.5)", ClassVersion::V1_5.to_string());
    assert_eq!("99.0", ClassVersion::new(99, 0).to_string());
  }

  serialization_test!( type = ClassVersion,
  {
      class_version_1_5,
      ClassVersion::V1_5,
      be = [0x00, 0x00, 0x00, 0x31]
  },
  {
      class_version_1_1,
      ClassVersion::V1_1,
      be = [0x00, 0x03, 0x00, 0x2D]
  },
  {
      class_version_8,
      ClassVersion::V1_8,
      be = [0x00, 0x00, 0x00, 0x34]
  },
  {
      class_version_preview,
      ClassVersion::new(65, 0xFFFF),
      be = [0xFF, 0xFF, 0x00, 0x41]
  });
}
