//! Audio domain: processing chain, metering, WAV codec

pub mod analysis;
pub mod dynamics;
pub mod graph;
pub mod shelf;
pub mod wav;

pub use analysis::{AnalyzerWindow, WaveformTrace, ANALYZER_WINDOW};
pub use dynamics::{Compressor, CompressorParams, VOICE_COMPRESSOR};
pub use graph::{ProcessingGraph, Stage};
pub use shelf::HighShelf;
pub use wav::{decode_wav_mono16, encode_wav_mono16, float_to_pcm16, DecodedWav, WavFile};
