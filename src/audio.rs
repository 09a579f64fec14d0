//! Audio cues via the Web Audio API
//!
//! Every cue is a short procedurally generated tone; there are no audio
//! assets. Playback is best-effort: failures are swallowed and must never
//! stall the simulation.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Audio manager for the game. Starts muted; the mute button toggles it.
pub struct AudioManager {
    ctx: Option<AudioContext>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, muted: true }
    }

    /// Resume the audio context (required after a user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play the cue for a simulation event, if any
    pub fn play(&self, event: &GameEvent) {
        match event {
            GameEvent::PlayerFired => self.beep(900.0, 0.04, 0.02),
            GameEvent::EnemyFired => self.beep(520.0, 0.04, 0.02),
            GameEvent::EnemyDown => self.beep(1200.0, 0.05, 0.02),
            GameEvent::PlayerHit => self.beep(200.0, 0.10, 0.04),
            GameEvent::PlayerRammed => self.beep(220.0, 0.08, 0.04),
            GameEvent::GameOver => self.beep(120.0, 0.2, 0.04),
            GameEvent::LevelUp(_) => {}
        }
    }

    /// Fire-and-forget sine tone: frequency in Hz, duration in seconds,
    /// linear volume. No-op while muted.
    pub fn beep(&self, freq: f32, duration: f64, volume: f32) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value(volume);

        let _ = osc.start();
        let _ = osc.stop_with_when(t + duration);
    }

    /// Oscillator wired through a gain node to the destination
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
