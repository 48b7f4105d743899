use crate::core::lifecycle::StateFn;

/// Phase of the start-up lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Constructed, not started.
    Idle,
    /// Waiting for the host to deliver every requested asset.
    Loading,
    /// Waiting for the host to decode the audio among them.
    Validating,
    /// Setup has run. Terminal.
    Ready,
}

/// A join counter: done once `target` arrivals have been counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    target: usize,
    arrived: usize,
}

impl Countdown {
    pub fn new(target: usize) -> Self {
        Self { target, arrived: 0 }
    }

    /// Record one arrival. Returns `true` exactly once, on the arrival that
    /// completes the count.
    pub fn arrive(&mut self) -> bool {
        if self.arrived >= self.target {
            return false;
        }
        self.arrived += 1;
        self.arrived == self.target
    }

    pub fn is_done(&self) -> bool {
        self.arrived >= self.target
    }

    pub fn remaining(&self) -> usize {
        self.target - self.arrived
    }
}

/// What `begin` decided.
pub enum Begin<G> {
    /// Assets are being fetched; run this load behaviour meanwhile, if any.
    Loading(Option<StateFn<G>>),
    /// No assets. Run setup now.
    Ready(StateFn<G>),
}

/// Gates the user's one-shot setup behind asset fetch and audio decode.
pub struct LoadingStateMachine<G> {
    phase: LoadPhase,
    setup: StateFn<G>,
    load: Option<StateFn<G>>,
    decodes: Countdown,
}

impl<G> LoadingStateMachine<G> {
    pub fn new(setup: StateFn<G>, load: Option<StateFn<G>>) -> Self {
        Self {
            phase: LoadPhase::Idle,
            setup,
            load,
            decodes: Countdown::default(),
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// The load behaviour, until loading completes.
    pub fn load_state(&self) -> Option<StateFn<G>> {
        self.load
    }

    /// Audio decodes still outstanding.
    pub fn pending_decodes(&self) -> usize {
        self.decodes.remaining()
    }

    /// Leave `Idle`. Calling it again is a no-op that reports `Loading(None)`.
    pub fn begin(&mut self, has_assets: bool) -> Begin<G> {
        if self.phase != LoadPhase::Idle {
            return Begin::Loading(None);
        }
        if has_assets {
            self.phase = LoadPhase::Loading;
            Begin::Loading(self.load)
        } else {
            Begin::Ready(self.finish())
        }
    }

    /// The whole batch has arrived, `audio_count` of it still needs decoding.
    /// Returns the setup callback when nothing is left to wait for.
    pub fn batch_fetched(&mut self, audio_count: usize) -> Option<StateFn<G>> {
        if self.phase != LoadPhase::Loading {
            return None;
        }
        self.phase = LoadPhase::Validating;
        self.decodes = Countdown::new(audio_count);
        if audio_count == 0 {
            Some(self.finish())
        } else {
            log::info!("Waiting for {} sound(s) to decode", audio_count);
            None
        }
    }

    /// One audio resource finished decoding. Returns the setup callback on
    /// the last one.
    pub fn sound_decoded(&mut self) -> Option<StateFn<G>> {
        if self.phase != LoadPhase::Validating {
            return None;
        }
        self.decodes.arrive().then(|| self.finish())
    }

    fn finish(&mut self) -> StateFn<G> {
        self.phase = LoadPhase::Ready;
        self.load = None;
        self.setup
    }
}

/// An on-demand batch started with `Hexi::load` after setup has run.
pub struct PendingBatch<G> {
    pub(crate) on_loaded: StateFn<G>,
    pub(crate) decodes: Option<Countdown>,
}

impl<G> PendingBatch<G> {
    pub fn new(on_loaded: StateFn<G>) -> Self {
        Self { on_loaded, decodes: None }
    }

    /// The batch has arrived. Returns the callback if no audio is pending.
    pub fn fetched(&mut self, audio_count: usize) -> Option<StateFn<G>> {
        if audio_count == 0 {
            return Some(self.on_loaded);
        }
        self.decodes = Some(Countdown::new(audio_count));
        None
    }

    /// One sound decoded. Returns the callback on the last one.
    pub fn decoded(&mut self) -> Option<StateFn<G>> {
        let decodes = self.decodes.as_mut()?;
        decodes.arrive().then_some(self.on_loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hexi::Hexi;

    fn setup(_: &mut u32, _: &mut Hexi<u32>) {}
    fn load(_: &mut u32, _: &mut Hexi<u32>) {}

    #[test]
    fn countdown_fires_once() {
        let mut countdown = Countdown::new(2);
        assert!(!countdown.arrive());
        assert!(countdown.arrive());
        assert!(!countdown.arrive());
        assert!(countdown.is_done());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn empty_asset_list_is_ready_immediately() {
        let mut machine = LoadingStateMachine::<u32>::new(setup, Some(load));
        assert!(matches!(machine.begin(false), Begin::Ready(_)));
        assert!(machine.is_ready());
        assert!(machine.load_state().is_none());
    }

    #[test]
    fn setup_waits_for_every_decode() {
        let mut machine = LoadingStateMachine::<u32>::new(setup, Some(load));
        match machine.begin(true) {
            Begin::Loading(behavior) => assert!(behavior.is_some()),
            Begin::Ready(_) => panic!("setup must wait for assets"),
        }
        assert_eq!(machine.phase(), LoadPhase::Loading);

        assert!(machine.batch_fetched(2).is_none());
        assert_eq!(machine.phase(), LoadPhase::Validating);
        assert_eq!(machine.pending_decodes(), 2);
        assert!(machine.sound_decoded().is_none());
        assert!(machine.sound_decoded().is_some());
        assert!(machine.is_ready());

        // Terminal: setup is never handed out again.
        assert!(machine.sound_decoded().is_none());
        assert!(machine.batch_fetched(0).is_none());
        assert!(matches!(machine.begin(true), Begin::Loading(None)));
    }

    #[test]
    fn batch_without_audio_skips_validation_wait() {
        let mut machine = LoadingStateMachine::<u32>::new(setup, None);
        assert!(matches!(machine.begin(true), Begin::Loading(None)));
        assert!(machine.batch_fetched(0).is_some());
        assert!(machine.is_ready());
    }

    #[test]
    fn pending_batch_counts_decodes() {
        let mut batch = PendingBatch::<u32>::new(load);
        assert!(batch.decoded().is_none());
        assert!(batch.fetched(1).is_none());
        assert!(batch.decoded().is_some());

        let mut silent = PendingBatch::<u32>::new(load);
        assert!(silent.fetched(0).is_some());
    }
}
