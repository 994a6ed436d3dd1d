//! Play/stop lifecycle of the drone.

use tracing::{debug, info, warn};

use super::context::{AudioContext, ContextFactory, NodeId};
use super::drone::build_drone;
use super::AudioError;
use crate::params::DroneParams;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// One playing episode: an owned context and the carriers started on it
pub struct AudioSession<C: AudioContext> {
    context: C,
    carriers: Vec<NodeId>,
}

impl<C: AudioContext> AudioSession<C> {
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Carriers in voice order
    pub fn carriers(&self) -> &[NodeId] {
        &self.carriers
    }

    /// Stop every carrier, then close the context.
    ///
    /// Each step is guarded on its own: a failing stop is logged and the
    /// remaining carriers and the context are still released.
    fn teardown(mut self) {
        for &carrier in &self.carriers {
            if let Err(e) = self.context.stop(carrier) {
                warn!(%carrier, error = %e, "Ignoring carrier stop failure");
            }
        }
        if let Err(e) = self.context.close() {
            warn!(error = %e, "Ignoring context close failure");
        }
    }
}

/// Two-state toggle owning at most one [`AudioSession`]
pub struct PlaybackController<F: ContextFactory> {
    factory: F,
    params: DroneParams,
    session: Option<AudioSession<F::Context>>,
}

impl<F: ContextFactory> PlaybackController<F> {
    /// Create a stopped controller
    pub fn new(factory: F, params: DroneParams) -> Self {
        Self {
            factory,
            params,
            session: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.session.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Live session, if playing
    pub fn session(&self) -> Option<&AudioSession<F::Context>> {
        self.session.as_ref()
    }

    /// Carriers started by the live session (empty while stopped)
    pub fn live_carriers(&self) -> &[NodeId] {
        self.session
            .as_ref()
            .map_or(&[][..], |session| session.carriers())
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Start when stopped, stop when playing; returns the new state
    pub fn toggle(&mut self) -> Result<PlaybackState, AudioError> {
        match self.state() {
            PlaybackState::Stopped => self.start()?,
            PlaybackState::Playing => self.stop(),
        }
        Ok(self.state())
    }

    /// Open a context, build the drone, and start every carrier.
    ///
    /// No-op while playing. On failure the partial session is torn down and
    /// the controller stays stopped.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.session.is_some() {
            debug!("Start requested while playing");
            return Ok(());
        }

        let mut context = self.factory.create()?;

        let carriers = match build_drone(&mut context, &self.params) {
            Ok(carriers) => carriers,
            Err(e) => {
                AudioSession {
                    context,
                    carriers: Vec::new(),
                }
                .teardown();
                return Err(e);
            }
        };

        let mut session = AudioSession {
            context,
            carriers: Vec::with_capacity(carriers.len()),
        };
        for carrier in carriers {
            if let Err(e) = session.context.start(carrier) {
                session.teardown();
                return Err(e);
            }
            session.carriers.push(carrier);
        }

        info!(carriers = session.carriers.len(), "Playback started");
        self.session = Some(session);
        Ok(())
    }

    /// Stop every carrier and release the context (hard stop, no fade).
    ///
    /// No-op while stopped.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown();
            info!("Playback stopped");
        }
    }

    /// Release any live session; also run on drop
    pub fn dispose(&mut self) {
        if self.session.is_some() {
            debug!("Disposing live session");
            self.stop();
        }
    }
}

impl<F: ContextFactory> Drop for PlaybackController<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SynthGraph;

    #[derive(Default)]
    struct CountingFactory {
        created: usize,
    }

    impl ContextFactory for CountingFactory {
        type Context = SynthGraph;

        fn create(&mut self) -> Result<SynthGraph, AudioError> {
            self.created += 1;
            Ok(SynthGraph::new())
        }
    }

    fn controller() -> PlaybackController<CountingFactory> {
        PlaybackController::new(CountingFactory::default(), DroneParams::default())
    }

    #[test]
    fn test_starts_stopped() {
        let controller = controller();

        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(controller.session().is_none());
        assert!(controller.live_carriers().is_empty());
        assert_eq!(controller.factory().created, 0);
    }

    #[test]
    fn test_toggle_starts_all_carriers() {
        let mut controller = controller();

        assert_eq!(controller.toggle().unwrap(), PlaybackState::Playing);

        let session = controller.session().unwrap();
        assert_eq!(session.carriers().len(), 3);
        assert_eq!(controller.live_carriers(), session.carriers());
        // Three carriers plus three vibrato LFOs
        assert_eq!(session.context().running_oscillators(), 6);
        assert!(!session.context().is_closed());
    }

    #[test]
    fn test_start_while_playing_reuses_session() {
        let mut controller = controller();

        controller.start().unwrap();
        controller.start().unwrap();

        assert_eq!(controller.factory().created, 1);
        assert!(controller.is_playing());
    }

    #[test]
    fn test_stop_while_stopped_is_noop() {
        let mut controller = controller();

        controller.stop();
        controller.dispose();

        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.factory().created, 0);
    }

    #[test]
    fn test_each_start_gets_a_fresh_context() {
        let mut controller = controller();

        for _ in 0..3 {
            controller.toggle().unwrap();
            controller.toggle().unwrap();
        }

        assert_eq!(controller.factory().created, 3);
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }
}
