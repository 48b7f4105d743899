//! Frame player for multi-frame sprites.
//!
//! Steps a sprite through a range of its texture frames at a fixed rate.

/// Default playback rate, in frames per second.
pub const DEFAULT_SPRITE_FPS: f32 = 12.0;

/// Playback state for one sprite's texture frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlayer {
    /// Playback rate in frames per second.
    pub fps: f32,
    /// Whether to wrap back to the start of the range.
    pub looping: bool,
    /// Whether the player advances on tick.
    pub playing: bool,
    /// First frame of the playing range.
    pub start: usize,
    /// Last frame of the playing range (inclusive).
    pub end: usize,
    /// Time accumulated on the current frame.
    timer: f32,
}

impl FramePlayer {
    /// Player covering `start..=end`, stopped.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            fps: DEFAULT_SPRITE_FPS,
            looping: true,
            playing: false,
            start: start.min(end),
            end: end.max(start),
            timer: 0.0,
        }
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Restart playback over `start..=end`. Returns the frame to show.
    pub fn play_range(&mut self, start: usize, end: usize) -> usize {
        self.start = start.min(end);
        self.end = end.max(start);
        self.timer = 0.0;
        self.playing = true;
        self.start
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.timer = 0.0;
    }

    /// Advance by `dt` seconds from `frame`. Returns the new frame index.
    pub fn tick(&mut self, frame: usize, dt: f32) -> usize {
        if !self.playing || self.fps <= 0.0 {
            return frame;
        }
        let frame_duration = 1.0 / self.fps;
        let mut frame = frame.clamp(self.start, self.end);
        self.timer += dt;

        while self.timer >= frame_duration {
            self.timer -= frame_duration;
            if frame >= self.end {
                if self.looping {
                    frame = self.start;
                } else {
                    self.playing = false;
                    self.timer = 0.0;
                    break;
                }
            } else {
                frame += 1;
            }
        }
        frame
    }

    /// Whether a non-looping range has reached its last frame.
    pub fn is_finished(&self, frame: usize) -> bool {
        !self.looping && !self.playing && frame >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_one_frame_per_period() {
        let mut player = FramePlayer::new(0, 3).with_fps(10.0);
        let frame = player.play_range(0, 3);
        let frame = player.tick(frame, 0.15);
        assert_eq!(frame, 1);
    }

    #[test]
    fn loops_back_to_range_start() {
        let mut player = FramePlayer::new(0, 3).with_fps(10.0);
        let mut frame = player.play_range(1, 2);
        frame = player.tick(frame, 0.1);
        assert_eq!(frame, 2);
        frame = player.tick(frame, 0.1);
        assert_eq!(frame, 1);
    }

    #[test]
    fn non_looping_stops_on_last_frame() {
        let mut player = FramePlayer::new(0, 2).with_fps(10.0).with_looping(false);
        let mut frame = player.play_range(0, 2);
        frame = player.tick(frame, 0.35);
        assert_eq!(frame, 2);
        assert!(!player.playing);
        assert!(player.is_finished(frame));
    }

    #[test]
    fn stopped_player_holds_frame() {
        let mut player = FramePlayer::new(0, 3);
        assert_eq!(player.tick(2, 1.0), 2);
    }
}
