use serde::{Deserialize, Serialize};

/// One input file as seen by the planner: a name (relative to the scan
/// directory) and a byte size.
///
/// Descriptors are created once at discovery time and read-only afterwards.
/// The size is unsigned, so a negative file size cannot be represented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
}

/// Sum of all file sizes, i.e. the total byte volume a job has to cover.
pub fn total_size(files: &[FileDescriptor]) -> u64 {
    files.iter().map(|f| f.size).sum()
}
