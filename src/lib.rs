//! Acid Recorder - voice recorder with a presence chain and WAV export
//!
//! Records the default microphone, runs every block through a fixed
//! voice/presence processing chain, shows a live level meter and
//! oscilloscope, and saves takes as 16-bit mono WAV files.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Signal processing, WAV encoding, recorder state machine, value objects
//! - **Application**: The recorder use case, capture pipeline and port interfaces (traits)
//! - **Infrastructure**: Adapters (cpal capture, file export, tiny-skia scope, XDG config)
//! - **CLI**: Argument parsing, terminal presenter, session commands and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
