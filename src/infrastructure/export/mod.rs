//! Recording export
//!
//! Writes encoded WAV files, either straight into the output directory
//! or wherever a save-as picker says.

mod file_exporter;

pub use file_exporter::{with_wav_extension, FileExporter};
