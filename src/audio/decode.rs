//! Decode audio files into mono waveforms using symphonia

use crate::model::WaveformBuffer;
use anyhow::{bail, Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoder bound to the first audio track of a file
struct TrackReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    /// Packets dropped because the codec reported corrupt data
    corrupt_packets: usize,
}

impl TrackReader {
    fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open audio file: {:?}", path))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let format = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .with_context(|| format!("Unrecognised audio format: {:?}", path))?
            .format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No audio track found")?;
        let track_id = track.id;
        let sample_rate = match track.codec_params.sample_rate {
            Some(rate) if rate > 0 => rate,
            _ => bail!("Audio track has no sample rate: {:?}", path),
        };
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .context("Unsupported audio codec")?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            corrupt_packets: 0,
        })
    }

    /// Decode the next packet of the track and append it, downmixed, to `out`
    ///
    /// Returns false once the stream is exhausted. Corrupt packets are
    /// counted and skipped; any other read or decode failure is an error.
    fn read_packet(&mut self, out: &mut Vec<f32>) -> Result<bool> {
        let packet = loop {
            match self.format.next_packet() {
                Ok(p) if p.track_id() == self.track_id => break p,
                Ok(_) => continue,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to read audio after {} samples", out.len())
                    })
                }
            }
        };

        match self.decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                downmix_into(out, buf.samples(), spec.channels.count());
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping corrupt packet at sample {}: {}", out.len(), msg);
                self.corrupt_packets += 1;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to decode audio after {} samples", out.len()))
            }
        }
        Ok(true)
    }
}

/// Decode an audio file to a mono waveform (channels averaged)
///
/// Fails if the file cannot be read or yields no samples.
pub fn load_waveform(path: &Path) -> Result<WaveformBuffer> {
    log::debug!("Decoding audio: {:?}", path);

    let mut reader = TrackReader::open(path)?;
    let mut mono: Vec<f32> = Vec::new();
    while reader.read_packet(&mut mono)? {}

    if reader.corrupt_packets > 0 {
        log::warn!(
            "{} corrupt packet(s) skipped in {:?}",
            reader.corrupt_packets,
            path
        );
    }
    if mono.is_empty() {
        bail!("No samples decoded from {:?}", path);
    }

    log::debug!(
        "Decoded {} samples ({:.2}s) at {}Hz",
        mono.len(),
        mono.len() as f64 / reader.sample_rate as f64,
        reader.sample_rate
    );

    Ok(WaveformBuffer::from_f32(&mono, reader.sample_rate))
}

/// Append interleaved samples to `out`, averaging channels
fn downmix_into(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels > 1 {
        out.extend(
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32),
        );
    } else {
        out.extend_from_slice(interleaved);
    }
}
