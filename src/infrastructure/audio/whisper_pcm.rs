use std::io::Cursor;

use candle_transformers::models::whisper as m;
use rubato::{FftFixedIn, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::InferenceError;

/// Whisper's mel frontend consumes mono f32 PCM at this rate; feeding it
/// anything else produces unusable features.
pub const MODEL_SAMPLE_RATE: u32 = m::SAMPLE_RATE as u32;

const RESAMPLE_CHUNK: usize = 1024;

struct SourceTrack {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
}

/// Decodes compressed audio bytes into the mono PCM stream the Whisper mel
/// frontend expects, downmixing and resampling to [`MODEL_SAMPLE_RATE`].
pub fn pcm_for_whisper(data: &[u8]) -> Result<Vec<f32>, InferenceError> {
    let mut track = open_default_track(data)?;
    let mono = decode_to_mono(&mut track)?;
    if mono.is_empty() {
        return Err(InferenceError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    let pcm = if track.sample_rate == MODEL_SAMPLE_RATE {
        mono
    } else {
        resample_to_model_rate(mono, track.sample_rate)?
    };

    tracing::debug!(
        samples = pcm.len(),
        duration_secs = pcm.len() as f32 / MODEL_SAMPLE_RATE as f32,
        "Audio decoded for Whisper inference"
    );
    Ok(pcm)
}

fn open_default_track(data: &[u8]) -> Result<SourceTrack, InferenceError> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(data.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| InferenceError::DecodingFailed(format!("probe: {}", e)))?;

    let reader = probed.format;
    let track = reader
        .default_track()
        .ok_or_else(|| InferenceError::DecodingFailed("no audio track found".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| InferenceError::DecodingFailed("unknown sample rate".to_string()))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| InferenceError::DecodingFailed(format!("codec: {}", e)))?;

    Ok(SourceTrack {
        reader,
        decoder,
        track_id,
        sample_rate,
        channels,
    })
}

fn decode_to_mono(track: &mut SourceTrack) -> Result<Vec<f32>, InferenceError> {
    let mut mono: Vec<f32> = Vec::new();
    loop {
        let packet = match track.reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(InferenceError::DecodingFailed(format!("packet: {}", e)));
            }
        };
        if packet.track_id() != track.track_id {
            continue;
        }

        let decoded = match track.decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(InferenceError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        let mut buffer = SampleBuffer::<f32>::new(frames as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        if track.channels > 1 {
            for frame in buffer.samples().chunks(track.channels) {
                mono.push(frame.iter().sum::<f32>() / track.channels as f32);
            }
        } else {
            mono.extend_from_slice(buffer.samples());
        }
    }
    Ok(mono)
}

fn resample_to_model_rate(samples: Vec<f32>, source_rate: u32) -> Result<Vec<f32>, InferenceError> {
    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        MODEL_SAMPLE_RATE as usize,
        RESAMPLE_CHUNK,
        2,
        1,
    )
    .map_err(|e| InferenceError::DecodingFailed(format!("resampler init: {}", e)))?;

    let ratio = MODEL_SAMPLE_RATE as f64 / source_rate as f64;
    let expected_len = (samples.len() as f64 * ratio) as usize;
    let mut output = Vec::with_capacity(expected_len + RESAMPLE_CHUNK);

    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        // The fixed-input resampler only accepts full chunks; the tail is
        // zero-padded and trimmed back off below.
        let input = if chunk.len() < RESAMPLE_CHUNK {
            let mut padded = chunk.to_vec();
            padded.resize(RESAMPLE_CHUNK, 0.0);
            padded
        } else {
            chunk.to_vec()
        };
        let resampled = resampler
            .process(&[input], None)
            .map_err(|e| InferenceError::DecodingFailed(format!("resample: {}", e)))?;
        if let Some(channel) = resampled.first() {
            output.extend_from_slice(channel);
        }
    }

    output.truncate(expected_len);
    Ok(output)
}
