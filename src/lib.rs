//! Downgrades the major version of compiled JVM class files so that classes
//! built by a newer compiler load on an older runtime.
//!
//! Only the major version field of the header is touched. Everything after
//! the header is copied byte for byte. [`VersionPatcher`] does this for one
//! buffer and [`Retrofitter`] applies it to a file or directory tree.


pub mod classfile;
pub mod error;
pub mod patcher;
pub mod retrofitter;

pub use classfile::{parse_header, ClassFile, ClassVersion, Header};
pub use error::{Error, Result};
pub use patcher::{is_already_patched, rewrite_major_version, PatchOutcome, VersionPatcher};
pub use retrofitter::{InvalidClassPolicy, RetrofitSummary, Retrofitter};

// Patching carries no shared state; everything may cross threads.
static_assertions::assert_impl_all!(ClassFile: Send, Sync);
static_assertions::assert_impl_all!(VersionPatcher: Send, Sync, Copy);
static_assertions::assert_impl_all!(Retrofitter: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync, std::error::Error);
