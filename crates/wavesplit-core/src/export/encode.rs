//! Segment rendering and file encoding
//!
//! A split goes through slice → optional edge trim → resample → channel
//! conversion before it reaches an encoder. Every step works on planar
//! buffers; only the final [`RenderedAudio`] is interleaved again.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::{NonZeroU32, NonZeroU8};
use std::path::Path;

use flacenc::component::BitRepr;
use flacenc::error::Verify;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::error::{EncodeError, EncodeResult};
use super::settings::{ChannelLayout, EncodeTarget, ExportFormat, Quality};
use crate::silence::{trim_range, DEFAULT_THRESHOLD_DB};
use crate::timeline::TimeRange;
use crate::types::AudioSource;

/// Frames fed to the resampler per call
const RESAMPLE_CHUNK: usize = 1024;

/// Frames handed to the lossy encoders per call
const ENCODE_CHUNK: usize = 4096;

/// Rates LAME can write (MPEG 1, 2 and 2.5)
pub const MP3_SAMPLE_RATES: &[u32] = &[8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000];

/// Interleaved audio at the target rate and channel count
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl RenderedAudio {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append `frames` frames of digital silence
    pub fn push_silence(&mut self, frames: usize) {
        let len = self.samples.len() + frames * self.channels as usize;
        self.samples.resize(len, 0.0);
    }

    /// Append another rendering with the same layout
    pub fn append(&mut self, other: &RenderedAudio) {
        debug_assert_eq!(self.channels, other.channels);
        debug_assert_eq!(self.sample_rate, other.sample_rate);
        self.samples.extend_from_slice(&other.samples);
    }
}

/// Render one time range of the source into the target layout
pub fn render_segment(
    source: &AudioSource,
    range: TimeRange,
    target: &EncodeTarget,
    trim_silence: bool,
) -> EncodeResult<RenderedAudio> {
    let mut frames = source.frames_for(range.start, range.end);

    if trim_silence && !frames.is_empty() {
        let kept = trim_range(&source.mono()[frames.clone()], DEFAULT_THRESHOLD_DB);
        frames = frames.start + kept.start..frames.start + kept.end;
    }

    let planar = deinterleave(source.interleaved(frames), source.channels());
    let planar = resample(planar, source.sample_rate(), target.sample_rate)?;
    let planar = convert_channels(planar, target.channels);

    Ok(RenderedAudio {
        samples: interleave(&planar),
        sample_rate: target.sample_rate,
        channels: target.channels.count(),
    })
}

/// Render and join splits with `silence_ms` of silence between them
pub fn render_concat(
    source: &AudioSource,
    splits: &[TimeRange],
    target: &EncodeTarget,
    trim_silence: bool,
    silence_ms: u32,
) -> EncodeResult<RenderedAudio> {
    let gap_frames = (silence_ms as u64 * target.sample_rate as u64 / 1000) as usize;
    let mut joined = RenderedAudio::new(target.sample_rate, target.channels.count());
    for (i, range) in splits.iter().enumerate() {
        if i > 0 {
            joined.push_silence(gap_frames);
        }
        joined.append(&render_segment(source, *range, target, trim_silence)?);
    }
    Ok(joined)
}

/// Fail early for targets an encoder would reject
pub fn check_encodable(target: &EncodeTarget) -> EncodeResult<()> {
    match target.format {
        ExportFormat::Mp3 if !MP3_SAMPLE_RATES.contains(&target.sample_rate) => {
            Err(EncodeError::UnsupportedSampleRate {
                format: target.format,
                sample_rate: target.sample_rate,
            })
        }
        _ => Ok(()),
    }
}

/// Encode to `path` in the target format; quality applies to lossy formats
pub fn encode_to_file(path: &Path, audio: &RenderedAudio, target: &EncodeTarget) -> EncodeResult<()> {
    match target.format {
        ExportFormat::Wav => write_wav(path, audio),
        ExportFormat::Flac => write_flac(path, audio),
        ExportFormat::Mp3 => write_mp3(path, audio, target.quality),
        ExportFormat::Ogg => write_ogg(path, audio, target.quality),
    }
}

/// Create the output folder (and parents) when missing
pub fn prepare_output_folder(folder: &Path) -> EncodeResult<()> {
    std::fs::create_dir_all(folder).map_err(|e| EncodeError::CreateDir {
        path: folder.to_path_buf(),
        source: e,
    })
}

/// 16-bit PCM WAV
pub fn write_wav(path: &Path, audio: &RenderedAudio) -> EncodeResult<()> {
    let wav_err = |source| EncodeError::Wav {
        path: path.to_path_buf(),
        source,
    };
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
    for &s in &audio.samples {
        writer.write_sample(to_i16(s)).map_err(wav_err)?;
    }
    writer.finalize().map_err(wav_err)
}

/// 16-bit FLAC
pub fn write_flac(path: &Path, audio: &RenderedAudio) -> EncodeResult<()> {
    let config = flacenc::config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodeError::Flac(format!("{:?}", e)))?;

    let pcm: Vec<i32> = audio.samples.iter().map(|&s| to_i16(s) as i32).collect();
    let source = flacenc::source::MemSource::from_samples(
        &pcm,
        audio.channels as usize,
        16,
        audio.sample_rate as usize,
    );

    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodeError::Flac(format!("{:?}", e)))?;

    let mut sink = flacenc::bitsink::ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| EncodeError::Flac(format!("{:?}", e)))?;

    std::fs::write(path, sink.as_slice()).map_err(|e| EncodeError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Constant-bitrate MP3 through LAME
pub fn write_mp3(path: &Path, audio: &RenderedAudio, quality: Quality) -> EncodeResult<()> {
    let mp3_err = |e: &dyn std::fmt::Debug| EncodeError::Mp3(format!("{:?}", e));

    let mut builder = mp3lame_encoder::Builder::new()
        .ok_or_else(|| EncodeError::Mp3("Failed to allocate LAME encoder".to_string()))?;
    builder
        .set_num_channels(audio.channels as u8)
        .map_err(|e| mp3_err(&e))?;
    builder
        .set_sample_rate(audio.sample_rate)
        .map_err(|e| mp3_err(&e))?;
    builder
        .set_brate(mp3_bitrate(quality))
        .map_err(|e| mp3_err(&e))?;
    let mut encoder = builder.build().map_err(|e| mp3_err(&e))?;

    let pcm: Vec<i16> = audio.samples.iter().map(|&s| to_i16(s)).collect();
    let chunk = ENCODE_CHUNK * audio.channels as usize;
    let mut out = Vec::new();
    for block in pcm.chunks(chunk) {
        let frames = block.len() / audio.channels as usize;
        out.reserve(mp3lame_encoder::max_required_buffer_size(frames));
        if audio.channels == 1 {
            encoder
                .encode_to_vec(mp3lame_encoder::MonoPcm(block), &mut out)
                .map_err(|e| mp3_err(&e))?;
        } else {
            encoder
                .encode_to_vec(mp3lame_encoder::InterleavedPcm(block), &mut out)
                .map_err(|e| mp3_err(&e))?;
        }
    }
    out.reserve(mp3lame_encoder::max_required_buffer_size(0));
    encoder
        .flush_to_vec::<mp3lame_encoder::FlushNoGap>(&mut out)
        .map_err(|e| mp3_err(&e))?;

    std::fs::write(path, out).map_err(|e| EncodeError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Average-bitrate Ogg Vorbis through libvorbis
pub fn write_ogg(path: &Path, audio: &RenderedAudio, quality: Quality) -> EncodeResult<()> {
    let ogg_err = |e: vorbis_rs::VorbisError| EncodeError::Ogg(e.to_string());

    let sample_rate = NonZeroU32::new(audio.sample_rate)
        .ok_or_else(|| EncodeError::Ogg("Sample rate is zero".to_string()))?;
    let channels = NonZeroU8::new(audio.channels as u8)
        .ok_or_else(|| EncodeError::Ogg("No channels".to_string()))?;
    let average_bitrate = NonZeroU32::new(quality.bitrate_kbps() * 1000)
        .ok_or_else(|| EncodeError::Ogg("Bitrate is zero".to_string()))?;

    let file = File::create(path).map_err(|e| EncodeError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut builder =
        vorbis_rs::VorbisEncoderBuilder::new(sample_rate, channels, BufWriter::new(file)).map_err(ogg_err)?;
    builder.bitrate_management_strategy(vorbis_rs::VorbisBitrateManagementStrategy::Abr { average_bitrate });
    let mut encoder = builder.build().map_err(ogg_err)?;

    let planar = deinterleave(&audio.samples, audio.channels);
    let frames = planar.first().map(Vec::len).unwrap_or(0);
    let mut start = 0;
    while start < frames {
        let end = (start + ENCODE_CHUNK).min(frames);
        let block: Vec<&[f32]> = planar.iter().map(|c| &c[start..end]).collect();
        encoder.encode_audio_block(&block).map_err(ogg_err)?;
        start = end;
    }

    let mut writer = encoder.finish().map_err(ogg_err)?;
    writer.flush().map_err(|e| EncodeError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn mp3_bitrate(quality: Quality) -> mp3lame_encoder::Bitrate {
    match quality {
        Quality::Low => mp3lame_encoder::Bitrate::Kbps128,
        Quality::Medium => mp3lame_encoder::Bitrate::Kbps192,
        Quality::High => mp3lame_encoder::Bitrate::Kbps320,
    }
}

fn to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

fn deinterleave(samples: &[f32], channels: u16) -> Vec<Vec<f32>> {
    let ch = channels.max(1) as usize;
    let frames = samples.len() / ch;
    let mut planar = vec![Vec::with_capacity(frames); ch];
    for frame in samples.chunks_exact(ch) {
        for (c, &s) in frame.iter().enumerate() {
            planar[c].push(s);
        }
    }
    planar
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.first().map(Vec::len).unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for i in 0..frames {
        for channel in planar {
            out.push(channel[i]);
        }
    }
    out
}

/// Mono averages every source channel; stereo keeps the first two or
/// duplicates a mono source
fn convert_channels(planar: Vec<Vec<f32>>, layout: ChannelLayout) -> Vec<Vec<f32>> {
    let frames = planar.first().map(Vec::len).unwrap_or(0);
    match layout {
        ChannelLayout::Mono if planar.len() == 1 => planar,
        ChannelLayout::Mono => {
            let n = planar.len() as f32;
            let mono = (0..frames)
                .map(|i| planar.iter().map(|c| c[i]).sum::<f32>() / n)
                .collect();
            vec![mono]
        }
        ChannelLayout::Stereo => match planar.len() {
            0 => vec![Vec::new(), Vec::new()],
            1 => {
                let mono = planar.into_iter().next().unwrap_or_default();
                vec![mono.clone(), mono]
            }
            _ => planar.into_iter().take(2).collect(),
        },
    }
}

/// Band-limited sinc resampling of planar audio
///
/// Output length is exactly `ceil(frames * to / from)`; the filter delay is
/// removed from the front.
fn resample(planar: Vec<Vec<f32>>, from: u32, to: u32) -> EncodeResult<Vec<Vec<f32>>> {
    let frames = planar.first().map(Vec::len).unwrap_or(0);
    if from == to || frames == 0 {
        return Ok(planar);
    }

    let ratio = to as f64 / from as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK, planar.len())
        .map_err(|e| EncodeError::Resample(e.to_string()))?;

    let expected = (frames as f64 * ratio).ceil() as usize;
    let delay = resampler.output_delay();
    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); planar.len()];

    let mut pos = 0;
    while frames - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + n]).collect();
        let produced = resampler
            .process(chunk.as_slice(), None)
            .map_err(|e| EncodeError::Resample(e.to_string()))?;
        append_planar(&mut out, produced);
        pos += n;
    }

    if pos < frames {
        let tail: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
        let produced = resampler
            .process_partial(Some(tail.as_slice()), None)
            .map_err(|e| EncodeError::Resample(e.to_string()))?;
        append_planar(&mut out, produced);
    }

    // Flush the filter tail
    while out[0].len() < delay + expected {
        let produced = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| EncodeError::Resample(e.to_string()))?;
        if produced.first().map(Vec::is_empty).unwrap_or(true) {
            break;
        }
        append_planar(&mut out, produced);
    }

    for channel in &mut out {
        channel.drain(..delay.min(channel.len()));
        channel.resize(expected, 0.0);
    }
    Ok(out)
}

fn append_planar(out: &mut [Vec<f32>], produced: Vec<Vec<f32>>) {
    for (dst, src) in out.iter_mut().zip(produced) {
        dst.extend_from_slice(&src);
    }
}
