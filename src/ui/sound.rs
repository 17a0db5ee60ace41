/// Sound engine: procedural handheld-style UI sounds via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely (the
/// stub SoundEngine does nothing).

use std::f32::consts::PI;

use crate::sim::effect::Effect;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    /// Cursor tick.
    Move,
    /// Screen switch sweep.
    Transition,
    /// Refused action buzz.
    Error,
    /// Order acknowledged chime.
    Executed,
    /// Quit dialog alarm.
    ModalOpen,
    /// Oracle request chirp.
    Scan,
    PowerOn,
}

impl Sfx {
    pub const ALL: [Sfx; 7] = [
        Sfx::Move,
        Sfx::Transition,
        Sfx::Error,
        Sfx::Executed,
        Sfx::ModalOpen,
        Sfx::Scan,
        Sfx::PowerOn,
    ];

    pub fn for_effect(effect: &Effect) -> Option<Sfx> {
        match effect {
            Effect::Moved | Effect::ModalClosed => Some(Sfx::Move),
            Effect::ViewChanged { .. } => Some(Sfx::Transition),
            Effect::Rejected => Some(Sfx::Error),
            Effect::Execute(_) => Some(Sfx::Executed),
            Effect::ModalOpened => Some(Sfx::ModalOpen),
            Effect::RequestAdvisory { .. } => Some(Sfx::Scan),
            Effect::Notify(_) | Effect::Quit => None,
        }
    }

    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    fn samples(self) -> Vec<f32> {
        match self {
            Sfx::Move => gen_blip(880.0, 0.025, 0.18),
            Sfx::Transition => gen_sweep(300.0, 1200.0, 0.12, 0.2),
            Sfx::Error => gen_buzz(),
            Sfx::Executed => gen_chime(&[(784.0, 0.07), (1047.0, 0.07), (1568.0, 0.16)]),
            Sfx::ModalOpen => gen_chime(&[(660.0, 0.08), (440.0, 0.08), (660.0, 0.08), (440.0, 0.12)]),
            Sfx::Scan => gen_sweep(1400.0, 700.0, 0.08, 0.15),
            Sfx::PowerOn => gen_sweep(80.0, 900.0, 0.45, 0.25),
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    use super::{make_wav, Sfx};

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: Vec<(Sfx, Arc<Vec<u8>>)>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };
            let buffers = Sfx::ALL
                .iter()
                .map(|&sfx| (sfx, Arc::new(make_wav(&sfx.samples()))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, sfx: Sfx) {
            let Some((_, buf)) = self.buffers.iter().find(|(s, _)| *s == sfx) else { return };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn sample_count(duration: f32) -> usize {
    (SAMPLE_RATE as f32 * duration) as usize
}

/// Sine blip with linear fade out.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
    let n = sample_count(duration);
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            (t * freq * 2.0 * PI).sin() * env * volume
        })
        .collect()
}

/// Linear frequency sweep; phase is accumulated so the glide is smooth.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
    let n = sample_count(duration);
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = from + (to - from) * t;
            phase += freq * 2.0 * PI / SAMPLE_RATE as f32;
            let env = (1.0 - t).powf(0.7);
            phase.sin() * env * volume
        })
        .collect()
}

/// Low square buzz with a little LCG noise.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_buzz() -> Vec<f32> {
    let n = sample_count(0.18);
    let mut rng: u32 = 4242;
    (0..n)
        .map(|i| {
            let ti = i as f32 / SAMPLE_RATE as f32;
            let square = if (ti * 110.0 * 2.0 * PI).sin() >= 0.0 { 1.0 } else { -1.0 };
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let env = 1.0 - i as f32 / n as f32;
            (square * 0.8 + noise * 0.2) * env * 0.18
        })
        .collect()
}

/// Note sequence, sine plus octave, each note fading.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_chime(notes: &[(f32, f32)]) -> Vec<f32> {
    let mut samples = Vec::new();
    for &(freq, dur) in notes {
        let n = sample_count(dur);
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            let wave = (t * freq * 2.0 * PI).sin() * 0.7 + (t * freq * 4.0 * PI).sin() * 0.3;
            samples.push(wave * env * 0.25);
        }
    }
    samples
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());

    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ViewState;

    #[test]
    fn effects_map_to_sounds() {
        assert_eq!(Sfx::for_effect(&Effect::Moved), Some(Sfx::Move));
        assert_eq!(Sfx::for_effect(&Effect::Rejected), Some(Sfx::Error));
        assert_eq!(
            Sfx::for_effect(&Effect::ViewChanged { from: ViewState::MarketList, to: ViewState::Account }),
            Some(Sfx::Transition)
        );
        assert_eq!(Sfx::for_effect(&Effect::Notify("x".into())), None);
        assert_eq!(Sfx::for_effect(&Effect::Quit), None);
    }

    #[test]
    fn every_sound_is_audible_and_bounded() {
        for sfx in Sfx::ALL {
            let s = sfx.samples();
            assert!(!s.is_empty(), "{sfx:?}");
            assert!(s.iter().all(|v| v.abs() <= 1.0), "{sfx:?}");
            assert!(s.iter().any(|v| v.abs() > 0.01), "{sfx:?}");
        }
    }

    #[test]
    fn wav_header_layout() {
        let wav = make_wav(&[0.0, 0.5, -0.5, 2.0]);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + 4 * 2);
        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size, 8);
        // clamped sample
        assert_eq!(i16::from_le_bytes([wav[50], wav[51]]), 32767);
    }
}
