//! Audio decoding using Symphonia

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::waveform::Waveform;
use crate::error::FeatureError;
use crate::preprocessing::channel_mixer::downmix_interleaved;

/// Decode an audio file to a mono waveform
///
/// The first track with a real codec is decoded in full, every packet is
/// downmixed to mono, and the file's native sample rate is kept (no
/// resampling). Corrupt packets are skipped.
///
/// # Arguments
///
/// * `path` - Path to audio file
///
/// # Returns
///
/// Mono `Waveform` at the native sample rate
///
/// # Errors
///
/// Returns `FeatureError::Decode` if the file cannot be opened, probed, or
/// decoded, or if no sample rate can be determined.
pub fn decode_file(path: &Path) -> Result<Waveform, FeatureError> {
    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path)
        .map_err(|e| FeatureError::Decode(format!("{}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FeatureError::Decode(format!("{}: {}", path.display(), e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            FeatureError::Decode(format!("{}: no supported audio tracks", path.display()))
        })?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| FeatureError::Decode(format!("{}: {}", path.display(), e)))?;

    let mut sample_rate = codec_params.sample_rate;
    let mut samples: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                // Chained streams: keep what the first stream produced.
                log::warn!("{}: stream reset requested, stopping", path.display());
                break;
            }
            Err(e) => return Err(FeatureError::Decode(format!("{}: {}", path.display(), e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if sample_rate.is_none() {
                    sample_rate = Some(spec.rate);
                }

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                let mono = downmix_interleaved(buffer.samples(), spec.channels.count())?;
                samples.extend_from_slice(&mono);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                log::warn!("{}: skipping corrupt packet ({})", path.display(), msg);
            }
            Err(e) => return Err(FeatureError::Decode(format!("{}: {}", path.display(), e))),
        }
    }

    let sample_rate = sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| FeatureError::Decode(format!("{}: unknown sample rate", path.display())))?;

    log::debug!(
        "Decoded {} mono samples at {} Hz ({} corrupt packets skipped)",
        samples.len(),
        sample_rate,
        skipped_packets
    );

    Waveform::new(samples, sample_rate)
}
