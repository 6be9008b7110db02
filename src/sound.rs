//! Sound effect triggers. Playback belongs to the host.

use serde::Serialize;

/// Sound effects the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Eat,
    Crash,
}

/// Fire-and-forget sound trigger
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);

    fn play_eat(&mut self) {
        self.play(SoundCue::Eat);
    }

    fn play_crash(&mut self) {
        self.play(SoundCue::Crash);
    }
}

/// Collects cues for delivery with the next frame
#[derive(Debug, Default)]
pub struct CueBuffer {
    cues: Vec<SoundCue>,
}

impl CueBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn cues(&self) -> &[SoundCue] {
        &self.cues
    }
}

impl SoundSink for CueBuffer {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl SoundSink for Muted {
    fn play(&mut self, _cue: SoundCue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_buffer() {
        let mut buffer = CueBuffer::new();
        buffer.play_eat();
        buffer.play_crash();
        assert_eq!(buffer.take(), vec![SoundCue::Eat, SoundCue::Crash]);
        assert!(buffer.cues().is_empty());
    }

    #[test]
    fn test_cue_json() {
        assert_eq!(serde_json::to_string(&SoundCue::Crash).unwrap(), r#""crash""#);
    }
}
