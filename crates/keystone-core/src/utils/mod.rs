pub mod fs;

pub use fs::{file_stem, find_files, find_files_with_extension, list_files_with_extension};
