//! Export naming: session labels, suggested filenames, save filters

pub mod filename;

pub use filename::{FileFilter, SessionLabel, SessionMetadata, WAV_FILTER};
