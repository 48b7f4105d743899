use std::collections::VecDeque;
use crate::api::error::{HexiError, Result};
use crate::assets::resources::AssetKind;

/// Tracks one batch of resource fetches.
///
/// The host polls `drain_fetch_requests`, fetches each path and hands the
/// payload back; every arrival advances `progress`. Audio paths in the
/// batch are queued for decoding once the whole batch has arrived.
#[derive(Debug, Default)]
pub struct LoadTracker {
    /// Paths of the current batch, in request order.
    assets: Vec<String>,
    pending: Vec<String>,
    audio: Vec<String>,
    /// Sounds handed to the host for decoding and not yet reported back.
    decoding: Vec<String>,
    fetch_requests: VecDeque<String>,
    decode_requests: VecDeque<String>,
    total: usize,
    arrived: usize,
    progress: f32,
    file: String,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or grow) a batch. Progress and the current file are reset
    /// even if an earlier batch is still arriving.
    pub fn begin(&mut self, paths: &[String]) -> usize {
        self.progress = 0.0;
        self.file.clear();
        let mut added = 0;
        for path in paths {
            if self.request(path) {
                added += 1;
            }
        }
        log::info!("Loading {} resource(s)", added);
        added
    }

    /// Add one more path to the running batch, e.g. an atlas image.
    /// Paths already in the batch are ignored.
    pub fn request(&mut self, path: &str) -> bool {
        if self.assets.iter().any(|p| p == path) {
            return false;
        }
        self.assets.push(path.to_string());
        self.pending.push(path.to_string());
        self.fetch_requests.push_back(path.to_string());
        self.total += 1;
        true
    }

    /// Check that a delivered path belongs to the batch.
    pub fn expects(&self, path: &str) -> Result<()> {
        if self.pending.iter().any(|p| p == path) {
            Ok(())
        } else {
            Err(HexiError::UnexpectedResource(path.to_string()))
        }
    }

    /// Record an arrival. Returns true when it completes the batch.
    pub fn arrive(&mut self, path: &str, kind: AssetKind) -> Result<bool> {
        let index = self
            .pending
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| HexiError::UnexpectedResource(path.to_string()))?;
        self.pending.swap_remove(index);
        self.arrived += 1;
        self.file = path.to_string();
        self.progress = self.arrived as f32 / self.total as f32 * 100.0;
        log::debug!("Loaded {} ({:.0}%)", path, self.progress);
        if kind == AssetKind::Audio {
            self.audio.push(path.to_string());
        }
        Ok(self.pending.is_empty())
    }

    /// Queue every fetched sound of the batch for decoding; returns how many.
    pub fn request_decodes(&mut self) -> usize {
        let count = self.audio.len();
        self.decoding.extend(self.audio.iter().cloned());
        self.decode_requests.extend(self.audio.drain(..));
        count
    }

    /// Sounds still waiting for the host's decode report.
    pub fn awaiting_decode(&self) -> usize {
        self.decoding.len()
    }

    /// Record a decode report. Each queued sound counts once; anything
    /// else is unexpected.
    pub fn decoded(&mut self, path: &str) -> Result<()> {
        let index = self
            .decoding
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| HexiError::UnexpectedResource(path.to_string()))?;
        self.decoding.swap_remove(index);
        Ok(())
    }

    /// Forget the finished batch. Progress and file keep their last values.
    pub fn finish(&mut self) {
        self.assets.clear();
        self.pending.clear();
        self.audio.clear();
        self.decoding.clear();
        self.total = 0;
        self.arrived = 0;
    }

    pub fn drain_fetch_requests(&mut self) -> Vec<String> {
        self.fetch_requests.drain(..).collect()
    }

    pub fn drain_decode_requests(&mut self) -> Vec<String> {
        self.decode_requests.drain(..).collect()
    }

    /// Paths of the batch in flight; empty once it has finished.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Fetches or decodes are still outstanding.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty() || !self.decoding.is_empty()
    }

    /// Percentage of the batch that has arrived, 0 to 100.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Last path that arrived.
    pub fn file(&self) -> &str {
        &self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn progress_follows_arrivals() {
        let mut tracker = LoadTracker::new();
        assert_eq!(tracker.begin(&paths(&["a.png", "b.wav", "c.json", "d.png"])), 4);
        assert_eq!(tracker.drain_fetch_requests().len(), 4);
        assert!(tracker.drain_fetch_requests().is_empty());

        assert!(!tracker.arrive("b.wav", AssetKind::Audio).unwrap());
        assert_relative_eq!(tracker.progress(), 25.0);
        assert_eq!(tracker.file(), "b.wav");
        assert!(!tracker.arrive("a.png", AssetKind::Image).unwrap());
        assert!(!tracker.arrive("d.png", AssetKind::Image).unwrap());
        assert!(tracker.arrive("c.json", AssetKind::Json).unwrap());
        assert_relative_eq!(tracker.progress(), 100.0);

        assert_eq!(tracker.request_decodes(), 1);
        assert_eq!(tracker.drain_decode_requests(), vec!["b.wav".to_string()]);
        tracker.finish();
        assert!(tracker.assets().is_empty());
    }

    #[test]
    fn unexpected_paths_are_rejected() {
        let mut tracker = LoadTracker::new();
        tracker.begin(&paths(&["a.png"]));
        assert!(tracker.expects("z.png").is_err());
        assert!(matches!(
            tracker.arrive("z.png", AssetKind::Image),
            Err(HexiError::UnexpectedResource(_))
        ));
        assert!(tracker.arrive("a.png", AssetKind::Image).unwrap());
        assert!(tracker.arrive("a.png", AssetKind::Image).is_err());
    }

    #[test]
    fn extra_requests_extend_the_batch() {
        let mut tracker = LoadTracker::new();
        tracker.begin(&paths(&["atlas.json"]));
        tracker.drain_fetch_requests();
        assert!(tracker.request("atlas.png"));
        assert!(!tracker.request("atlas.png"));
        assert!(!tracker.arrive("atlas.json", AssetKind::Json).unwrap());
        assert_relative_eq!(tracker.progress(), 50.0);
        assert_eq!(tracker.drain_fetch_requests(), vec!["atlas.png".to_string()]);
        assert!(tracker.arrive("atlas.png", AssetKind::Image).unwrap());
    }

    #[test]
    fn new_batch_resets_progress() {
        let mut tracker = LoadTracker::new();
        tracker.begin(&paths(&["a.png"]));
        tracker.arrive("a.png", AssetKind::Image).unwrap();
        tracker.finish();
        tracker.begin(&paths(&["b.png"]));
        assert_eq!(tracker.progress(), 0.0);
        assert_eq!(tracker.file(), "");
    }

    #[test]
    fn each_queued_sound_decodes_once() {
        let mut tracker = LoadTracker::new();
        tracker.begin(&paths(&["a.wav", "b.wav"]));
        tracker.arrive("a.wav", AssetKind::Audio).unwrap();
        tracker.arrive("b.wav", AssetKind::Audio).unwrap();
        assert!(matches!(tracker.decoded("a.wav"), Err(HexiError::UnexpectedResource(_))));

        tracker.request_decodes();
        assert_eq!(tracker.awaiting_decode(), 2);
        tracker.decoded("a.wav").unwrap();
        assert!(tracker.decoded("a.wav").is_err());
        assert!(tracker.decoded("c.wav").is_err());
        assert!(tracker.is_loading());
        tracker.decoded("b.wav").unwrap();
        assert_eq!(tracker.awaiting_decode(), 0);
        assert!(!tracker.is_loading());
    }
}
