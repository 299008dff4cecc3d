//! Frame animation state for the year slider.

/// Selectable playback speeds in frames per second.
pub const SPEEDS: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

/// Which frame is showing and whether the animation is running.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    frame_count: usize,
    index: usize,
    playing: bool,
    frames_per_second: f64,
    last_advance: Option<f64>,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            frame_count: 0,
            index: 0,
            playing: false,
            frames_per_second: SPEEDS[1],
            last_advance: None,
        }
    }
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new set of frames, showing the latest one.
    pub fn reset(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.index = frame_count.saturating_sub(1);
        self.playing = false;
        self.last_advance = None;
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Jump to a frame; stops playback.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.frame_count.saturating_sub(1));
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start or stop. Playing from the last frame restarts at the first.
    pub fn toggle(&mut self) {
        if self.playing {
            self.playing = false;
            return;
        }
        if self.frame_count < 2 {
            return;
        }
        if self.index + 1 >= self.frame_count {
            self.index = 0;
        }
        self.playing = true;
        self.last_advance = None;
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn set_frames_per_second(&mut self, fps: f64) {
        if fps > 0.0 {
            self.frames_per_second = fps;
        }
    }

    /// Advance according to the clock `now` (seconds). Returns true when the
    /// frame changed. Playback stops on the last frame.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.playing {
            return false;
        }
        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return false;
        };
        if now - last < 1.0 / self.frames_per_second {
            return false;
        }

        self.last_advance = Some(now);
        self.index += 1;
        if self.index + 1 >= self.frame_count {
            self.index = self.frame_count.saturating_sub(1);
            self.playing = false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_shows_latest_frame() {
        let mut playback = Playback::new();
        playback.reset(5);
        assert_eq!(playback.index(), 4);
        assert!(!playback.is_playing());

        playback.reset(0);
        assert_eq!(playback.index(), 0);
    }

    #[test]
    fn test_toggle_at_end_restarts() {
        let mut playback = Playback::new();
        playback.reset(3);
        playback.toggle();
        assert!(playback.is_playing());
        assert_eq!(playback.index(), 0);
    }

    #[test]
    fn test_single_frame_does_not_play() {
        let mut playback = Playback::new();
        playback.reset(1);
        playback.toggle();
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_tick_advances_at_speed_and_stops_at_end() {
        let mut playback = Playback::new();
        playback.reset(3);
        playback.set_frames_per_second(2.0);
        playback.toggle();

        assert!(!playback.tick(10.0));
        assert!(!playback.tick(10.2));
        assert!(playback.tick(10.5));
        assert_eq!(playback.index(), 1);
        assert!(playback.is_playing());

        assert!(playback.tick(11.0));
        assert_eq!(playback.index(), 2);
        assert!(!playback.is_playing());
        assert!(!playback.tick(20.0));
    }

    #[test]
    fn test_seek_clamps_and_pauses() {
        let mut playback = Playback::new();
        playback.reset(4);
        playback.seek(0);
        playback.toggle();
        playback.seek(10);
        assert_eq!(playback.index(), 3);
        assert!(!playback.is_playing());
    }

    #[test]
    fn test_zero_speed_is_ignored() {
        let mut playback = Playback::new();
        playback.set_frames_per_second(0.0);
        assert_eq!(playback.frames_per_second(), SPEEDS[1]);
    }
}
