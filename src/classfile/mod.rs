// class file header and container
pub mod class_file;
pub mod class_version;
pub mod header;
pub mod magic;

pub mod validity;

pub use class_file::ClassFile;
pub use class_version::ClassVersion;
pub use header::{parse_header, Header, HEADER_LENGTH, MAJOR_VERSION_OFFSET};
pub use magic::Magic;
