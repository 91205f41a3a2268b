use std::{
  fs,
  ops::{Add, AddAssign},
  path::Path,
};

#[allow(unused_imports)]
use log::{debug, info, trace, warn};

use bytes::Bytes;

use crate::{
  error::{Error, Result},
  patcher::{PatchOutcome, VersionPatcher},
};

const CLASS_FILE_EXTENSION: &[u8] = b".class";

/// What to do with a `.class` file that is not a valid class file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidClassPolicy {
  /// Stop the walk and return the error.
  #[default]
  Abort,
  /// Log a warning, leave the file alone and continue.
  Skip,
}

/// Counts of what happened to the class files visited by a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetrofitSummary {
  /// Class files whose major version was rewritten.
  pub rewritten: usize,
  /// Class files already at the target, copied as they are to the destination.
  pub copied_unchanged: usize,
  /// Class files that needed no work: destination newer than source, or
  /// already at the target when patching in place.
  pub up_to_date: usize,
  /// Invalid class files passed over under [`InvalidClassPolicy::Skip`].
  pub invalid_skipped: usize,
}

impl RetrofitSummary {
  pub fn files_written(&self) -> usize {
    self.rewritten + self.copied_unchanged
  }
}

impl Add for RetrofitSummary {
  type Output = RetrofitSummary;

  fn add(self, other: RetrofitSummary) -> RetrofitSummary {
    RetrofitSummary {
      rewritten: self.rewritten + other.rewritten,
      copied_unchanged: self.copied_unchanged + other.copied_unchanged,
      up_to_date: self.up_to_date + other.up_to_date,
      invalid_skipped: self.invalid_skipped + other.invalid_skipped,
    }
  }
}

impl AddAssign for RetrofitSummary {
  fn add_assign(&mut self, other: RetrofitSummary) {
    *self = *self + other;
  }
}

/// Walks a file or directory tree and patches every class file in it,
/// either in place or into a mirrored destination tree.
#[derive(Debug, Clone, Default)]
pub struct Retrofitter {
  patcher: VersionPatcher,
  invalid_class_policy: InvalidClassPolicy,
}

impl Retrofitter {
  pub fn new(patcher: VersionPatcher) -> Retrofitter {
    Retrofitter {
      patcher,
      invalid_class_policy: InvalidClassPolicy::default(),
    }
  }

  pub fn invalid_class_policy(mut self, policy: InvalidClassPolicy) -> Retrofitter {
    self.invalid_class_policy = policy;
    self
  }

  pub fn patcher(&self) -> &VersionPatcher {
    &self.patcher
  }

  pub fn retrofit_in_place(&self, src: &Path) -> Result<RetrofitSummary> {
    self.retrofit(src, None)
  }

  /// Patches `src`, or if it is a directory, every class file below it.
  ///
  /// With `dst`, results are written to the same relative location under
  /// `dst` and a destination file not older than its source is left alone.
  /// Without `dst`, files are patched in place.
  ///
  /// `src` itself may be a symbolic link, but links to directories found
  /// below it are not followed.
  pub fn retrofit(&self, src: &Path, dst: Option<&Path>) -> Result<RetrofitSummary> {
    let summary = self.visit(src, dst)?;
    info!(
      "{}: {} rewritten, {} copied unchanged, {} up to date, {} invalid skipped",
      src.display(),
      summary.rewritten,
      summary.copied_unchanged,
      summary.up_to_date,
      summary.invalid_skipped
    );
    Ok(summary)
  }

  fn visit(&self, src: &Path, dst: Option<&Path>) -> Result<RetrofitSummary> {
    if src.is_dir() {
      let mut entries = fs::read_dir(src)
        .and_then(|dir| dir.collect::<std::io::Result<Vec<_>>>())
        .map_err(Error::io(src))?;
      entries.sort_by_key(|entry| entry.file_name());

      let mut summary = RetrofitSummary::default();
      for entry in entries {
        let file_type = entry.file_type().map_err(Error::io(entry.path()))?;
        if file_type.is_symlink() && entry.path().is_dir() {
          debug!("not following directory link {}", entry.path().display());
          continue;
        }
        let child_dst = dst.map(|d| d.join(entry.file_name()));
        summary += self.visit(&entry.path(), child_dst.as_deref())?;
      }
      Ok(summary)
    } else if is_class_file(src) {
      self.retrofit_file(src, dst)
    } else {
      trace!("ignoring {}", src.display());
      Ok(RetrofitSummary::default())
    }
  }

  fn retrofit_file(&self, src: &Path, dst: Option<&Path>) -> Result<RetrofitSummary> {
    let mut summary = RetrofitSummary::default();
    if let Some(dst) = dst {
      if !needs_update(src, dst)? {
        trace!("{} is up to date", dst.display());
        summary.up_to_date += 1;
        return Ok(summary);
      }
    }

    let input = Bytes::from(fs::read(src).map_err(Error::io(src))?);
    let outcome = match self.patcher.patch(input.clone()) {
      Ok(outcome) => outcome,
      Err(e) if e.is_invalid_format() && self.invalid_class_policy == InvalidClassPolicy::Skip => {
        warn!("skipping {}: {e}", src.display());
        summary.invalid_skipped += 1;
        return Ok(summary);
      }
      Err(Error::InvalidFormat { reason }) => {
        return Err(Error::InvalidFormat {
          reason: format!("{}: {reason}", src.display()),
        })
      }
      Err(e) => return Err(e),
    };

    match (outcome, dst) {
      (PatchOutcome::AlreadyPatched { .. }, None) => {
        trace!("{} already at target version", src.display());
        summary.up_to_date += 1;
      }
      (PatchOutcome::AlreadyPatched { .. }, Some(dst)) => {
        write_output(dst, &input)?;
        summary.copied_unchanged += 1;
      }
      (PatchOutcome::Rewritten { from, bytes }, dst) => {
        let out_path = dst.unwrap_or(src);
        write_output(out_path, &bytes)?;
        debug!(
          "{}: {} -> {}",
          out_path.display(),
          from,
          self.patcher.target_major()
        );
        summary.rewritten += 1;
      }
    }
    Ok(summary)
  }
}

fn is_class_file(path: &Path) -> bool {
  path
    .file_name()
    .map_or(false, |name| name.as_encoded_bytes().ends_with(CLASS_FILE_EXTENSION))
}

// Destination is rewritten when missing or strictly older than the source.
fn needs_update(src: &Path, dst: &Path) -> Result<bool> {
  if !dst.exists() {
    return Ok(true);
  }
  let src_modified = fs::metadata(src)
    .and_then(|m| m.modified())
    .map_err(Error::io(src))?;
  let dst_modified = fs::metadata(dst)
    .and_then(|m| m.modified())
    .map_err(Error::io(dst))?;
  Ok(dst_modified < src_modified)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() && !parent.is_dir() {
      fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
  }
  fs::write(path, bytes).map_err(Error::io(path))
}
