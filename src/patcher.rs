use bytes::Bytes;
#[allow(unused_imports)]
use log::{debug, trace};

use crate::{
  classfile::{class_file::ClassFile, class_version::ClassVersion, header::Header},
  error::Result,
};

/// True if the header already carries `target_major`, so rewriting would be
/// a no-op.
pub fn is_already_patched(header: &Header, target_major: u16) -> bool {
  header.major_version() == target_major
}

/// Copy of `bytes` with the major version replaced by `target_major`.
///
/// The input is validated first and nothing is produced if it is not a class
/// file. All bytes other than the major version field are copied as they
/// are, so applying this twice with the same target gives the same result.
pub fn rewrite_major_version(bytes: &[u8], target_major: u16) -> Result<Vec<u8>> {
  let output = match VersionPatcher::new(target_major).patch(Bytes::copy_from_slice(bytes))? {
    PatchOutcome::AlreadyPatched { .. } => bytes.to_vec(),
    PatchOutcome::Rewritten { bytes, .. } => bytes.to_vec(),
  };
  Ok(output)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
  /// Input already had the target major version. No bytes are produced.
  AlreadyPatched { header: Header },
  /// Input was rewritten from version `from`.
  Rewritten { from: ClassVersion, bytes: Bytes },
}

impl PatchOutcome {
  pub fn is_rewritten(&self) -> bool {
    matches!(self, PatchOutcome::Rewritten { .. })
  }
}

/// Lowers (or raises) the major version of class files to a fixed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPatcher {
  target_major: u16,
}

impl VersionPatcher {
  pub fn new(target_major: u16) -> VersionPatcher {
    VersionPatcher { target_major }
  }

  pub fn for_version(target: ClassVersion) -> VersionPatcher {
    VersionPatcher::new(target.major)
  }

  pub fn target_major(&self) -> u16 {
    self.target_major
  }

  /// Parses `bytes` as a [`ClassFile`] and, unless it already has the
  /// target major version, serializes a copy carrying the target. The
  /// trailer of the result shares storage with `bytes`.
  pub fn patch(&self, bytes: Bytes) -> Result<PatchOutcome> {
    let class_file = ClassFile::from_bytes(bytes)?;
    let header = *class_file.header();
    if is_already_patched(&header, self.target_major) {
      trace!("class file already at major version {}", self.target_major);
      return Ok(PatchOutcome::AlreadyPatched { header });
    }

    let output = class_file.with_major_version(self.target_major).to_bytes();
    debug!(
      "rewrote major version {} -> {}",
      header.version, self.target_major
    );
    Ok(PatchOutcome::Rewritten {
      from: header.version,
      bytes: output,
    })
  }
}

impl Default for VersionPatcher {
  fn default() -> Self {
    VersionPatcher::for_version(ClassVersion::DEFAULT_TARGET)
  }
}
