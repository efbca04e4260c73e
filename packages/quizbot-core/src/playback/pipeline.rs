//! Decode pipelines turning preview bytes into voice frames.
//!
//! A pipeline has a write side (compressed bytes from the preview download)
//! and a read side (fixed-size PCM frames pulled by the voice sink). A fresh
//! pipeline is built for every track so no decoder state crosses a stream
//! boundary.

use std::io::Cursor;

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{PlaybackError, PlaybackResult};
use crate::protocol_constants::{FRAME_SAMPLES, VOICE_CHANNELS, VOICE_SAMPLE_RATE};

/// 20 ms of interleaved stereo 16-bit PCM at 48 kHz.
///
/// Opus encoding is left to the voice transport behind the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    samples: Vec<i16>,
}

impl AudioFrame {
    /// Builds a frame from interleaved samples, zero-padding a short tail.
    #[must_use]
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut frame = vec![0i16; FRAME_SAMPLES];
        let len = samples.len().min(FRAME_SAMPLES);
        frame[..len].copy_from_slice(&samples[..len]);
        Self { samples: frame }
    }

    #[must_use]
    pub fn silence() -> Self {
        Self {
            samples: vec![0; FRAME_SAMPLES],
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// One track's decode chain.
pub trait DecodePipeline: Send {
    /// Feeds compressed bytes into the pipeline.
    fn write(&mut self, data: &[u8]) -> PlaybackResult<()>;

    /// Marks the end of input.
    ///
    /// May be CPU heavy; callers run it off the async runtime.
    fn finish(&mut self) -> PlaybackResult<()>;

    /// Returns the next frame, or `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> PlaybackResult<Option<AudioFrame>>;
}

/// Builds a new, empty pipeline per track.
pub trait PipelineFactory: Send + Sync {
    fn create(&self) -> PlaybackResult<Box<dyn DecodePipeline>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// MP3 Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Factory for [`Mp3Pipeline`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mp3PipelineFactory;

impl PipelineFactory for Mp3PipelineFactory {
    fn create(&self) -> PlaybackResult<Box<dyn DecodePipeline>> {
        Ok(Box::new(Mp3Pipeline::new()))
    }
}

/// MP3 → PCM pipeline backed by symphonia and rubato.
///
/// Previews are short, so the whole clip is buffered, decoded and resampled
/// on [`finish`](DecodePipeline::finish); frames are then sliced on demand.
#[derive(Debug, Default)]
pub struct Mp3Pipeline {
    input: Vec<u8>,
    pcm: Vec<i16>,
    cursor: usize,
    finished: bool,
}

impl Mp3Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn from_pcm(pcm: Vec<i16>) -> Self {
        Self {
            pcm,
            finished: true,
            ..Self::default()
        }
    }
}

impl DecodePipeline for Mp3Pipeline {
    fn write(&mut self, data: &[u8]) -> PlaybackResult<()> {
        if self.finished {
            return Err(PlaybackError::Pipeline("write after end of input".into()));
        }
        self.input.extend_from_slice(data);
        Ok(())
    }

    fn finish(&mut self) -> PlaybackResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let input = std::mem::take(&mut self.input);
        let decoded = decode_mp3(input)?;
        let stereo = to_stereo(&decoded.samples, decoded.channels);
        let resampled = resample_stereo(stereo, decoded.sample_rate)?;
        self.pcm = to_i16(&resampled);

        log::debug!(
            "[Pipeline] Decoded preview: {} Hz, {} ch, {} frames",
            decoded.sample_rate,
            decoded.channels,
            self.pcm.len() / FRAME_SAMPLES
        );
        Ok(())
    }

    fn next_frame(&mut self) -> PlaybackResult<Option<AudioFrame>> {
        if !self.finished {
            return Err(PlaybackError::Pipeline("read before end of input".into()));
        }
        if self.cursor >= self.pcm.len() {
            return Ok(None);
        }
        let end = (self.cursor + FRAME_SAMPLES).min(self.pcm.len());
        let frame = AudioFrame::from_samples(&self.pcm[self.cursor..end]);
        self.cursor = end;
        Ok(Some(frame))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding Helpers
// ─────────────────────────────────────────────────────────────────────────────

struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

/// Decodes a complete MP3 clip into interleaved f32 samples.
fn decode_mp3(data: Vec<u8>) -> PlaybackResult<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("failed to probe preview: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PlaybackError::Decode("no audio track in preview".into()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(PlaybackError::Decode(format!("failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("[Pipeline] Skipping corrupt packet: {}", e);
            }
            Err(e) => return Err(PlaybackError::Decode(format!("decode failed: {}", e))),
        }
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels: channels.max(1),
    })
}

/// Converts interleaved audio with any channel count into interleaved stereo.
fn to_stereo(samples: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => samples.to_vec(),
        n => samples
            .chunks_exact(n)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}

/// Resamples interleaved stereo to the voice sample rate.
fn resample_stereo(stereo: Vec<f32>, input_rate: u32) -> PlaybackResult<Vec<f32>> {
    let frames = stereo.len() / VOICE_CHANNELS;
    if input_rate == VOICE_SAMPLE_RATE || frames == 0 {
        return Ok(stereo);
    }

    let mut planar = vec![Vec::with_capacity(frames); VOICE_CHANNELS];
    for frame in stereo.chunks_exact(VOICE_CHANNELS) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    let mut resampler = FastFixedIn::<f32>::new(
        VOICE_SAMPLE_RATE as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Cubic,
        frames,
        VOICE_CHANNELS,
    )
    .map_err(|e| PlaybackError::Decode(format!("failed to create resampler: {}", e)))?;

    let output = resampler
        .process(&planar, None)
        .map_err(|e| PlaybackError::Decode(format!("resampling failed: {}", e)))?;

    let out_frames = output.first().map_or(0, Vec::len);
    let mut interleaved = Vec::with_capacity(out_frames * VOICE_CHANNELS);
    for i in 0..out_frames {
        for channel in &output {
            interleaved.push(channel[i]);
        }
    }
    Ok(interleaved)
}

fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}
