//! WAV export checked against an independent reader

use std::io::Cursor;

use acid_recorder::domain::audio::{decode_wav_mono16, encode_wav_mono16};
use acid_recorder::domain::error::WavError;

fn read_with_hound(bytes: &[u8]) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::new(Cursor::new(bytes.to_vec())).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(Result::unwrap).collect();
    (spec, samples)
}

#[test]
fn hound_reads_our_header() {
    let samples: Vec<f32> = (0..4800).map(|i| (i as f32 / 48.0).sin() * 0.5).collect();
    let wav = encode_wav_mono16(&samples, 48000).unwrap();

    let (spec, decoded) = read_with_hound(wav.bytes());
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(decoded.len(), 4800);
}

#[test]
fn one_second_at_48k_is_96044_bytes() {
    let wav = encode_wav_mono16(&vec![0.0; 48000], 48000).unwrap();
    assert_eq!(wav.size_bytes(), 96044);
    assert_eq!(wav.duration_ms(), 1000);
}

#[test]
fn full_scale_samples_hit_the_pcm_limits() {
    let wav = encode_wav_mono16(&[1.0, -1.0, 0.0, 2.5, -7.0], 44100).unwrap();
    let (_, decoded) = read_with_hound(wav.bytes());
    assert_eq!(decoded, vec![32767, -32768, 0, 32767, -32768]);
}

#[test]
fn hound_written_file_decodes_to_the_same_samples() {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let pcm: Vec<i16> = vec![0, 1, -1, 1234, -31000, 32767, -32768];

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in &pcm {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    let decoded = decode_wav_mono16(cursor.get_ref()).unwrap();
    assert_eq!(decoded.sample_rate, 22050);
    assert_eq!(decoded.samples, pcm);
}

#[test]
fn encoding_is_deterministic() {
    let samples: Vec<f32> = (0..1000).map(|i| ((i * 37) % 200) as f32 / 100.0 - 1.0).collect();
    let a = encode_wav_mono16(&samples, 48000).unwrap();
    let b = encode_wav_mono16(&samples, 48000).unwrap();
    assert_eq!(a.bytes(), b.bytes());
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(
        encode_wav_mono16(&[], 48000).unwrap_err(),
        WavError::EmptyRecording
    );
}
