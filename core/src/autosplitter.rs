//! Autosplitter lifecycle.
//!
//! The host calls [`Autosplitter::tick`] periodically. Each tick re-attaches the
//! provider; while attached the four handlers are subscribed to the provider's
//! channels exactly once, and when attachment is lost every handler is
//! unsubscribed, the loading state is cleared and the timer is paused.
//!
//! Lines and battle signals are delivered from the provider's own context, not
//! from the tick. Handler state is locked inside each handler; the subscription
//! flag is only touched through `&mut self`.

use std::sync::{Arc, PoisonError, RwLock};

use cs3split_types::{BattleTag, SplitSettings};
use tracing::{debug, info};

use crate::events::HandlerId;
use crate::handlers::{AnimationSkipper, BattleSplitter, LoadRemover, RunStartDetector};
use crate::input::KeyPresser;
use crate::provider::StreamProvider;
use crate::signal_processor::LoadingState;
use crate::timer::TimerControl;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The provider could not attach; the timer is paused.
    Detached,
    /// Attached and refreshed. `newly_subscribed` is set on the tick that
    /// (re)subscribed the handlers.
    Attached { newly_subscribed: bool },
}

pub struct Autosplitter<P: StreamProvider> {
    provider: P,
    timer: Arc<dyn TimerControl>,
    settings: Arc<RwLock<SplitSettings>>,
    run_start: Arc<RunStartDetector>,
    load_remover: Arc<LoadRemover>,
    battle_splitter: Arc<BattleSplitter>,
    animation_skipper: Arc<AnimationSkipper>,
    subscribed: bool,
    was_attached: bool,
}

impl<P: StreamProvider> Autosplitter<P> {
    pub fn new(
        provider: P,
        timer: Arc<dyn TimerControl>,
        settings: Arc<RwLock<SplitSettings>>,
        presser: Arc<dyn KeyPresser>,
    ) -> Self {
        Self {
            run_start: Arc::new(RunStartDetector::new(Arc::clone(&timer))),
            load_remover: Arc::new(LoadRemover::new(Arc::clone(&timer))),
            battle_splitter: Arc::new(BattleSplitter::new(
                Arc::clone(&settings),
                Arc::clone(&timer),
            )),
            animation_skipper: Arc::new(AnimationSkipper::new(presser, Arc::clone(&settings))),
            provider,
            timer,
            settings,
            subscribed: false,
            was_attached: false,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.provider.attach() {
            if self.was_attached {
                info!("Lost attachment, pausing timer");
                self.was_attached = false;
            }
            self.unsubscribe_handlers();
            // Lines from the old connection may still be in flight; once reset
            // they are ignored and the forced pause is the last command
            self.load_remover.reset();
            self.timer.set_paused(true);
            return TickOutcome::Detached;
        }

        if !self.was_attached {
            info!("Attached");
            self.was_attached = true;
        }

        let newly_subscribed = !self.subscribed;
        if newly_subscribed {
            self.subscribe_handlers();
        }

        self.provider.refresh_values();
        TickOutcome::Attached { newly_subscribed }
    }

    /// Unsubscribe every handler. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.unsubscribe_handlers();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn loading_state(&self) -> LoadingState {
        self.load_remover.state()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn settings(&self) -> &Arc<RwLock<SplitSettings>> {
        &self.settings
    }

    fn skip_animations(&self) -> bool {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .skip_battle_animations
    }

    fn subscribe_handlers(&mut self) {
        if self.subscribed {
            return;
        }
        info!("Subscribing events...");
        let channels = self.provider.channels();

        let run_start = Arc::clone(&self.run_start);
        if channels.lines.subscribe(
            HandlerId::RunStart,
            Arc::new(move |line: &str| {
                run_start.on_line(line);
            }),
        ) {
            debug!(handler = %HandlerId::RunStart, "Line stream hooked");
        }

        let load_remover = Arc::clone(&self.load_remover);
        let connection = load_remover.connect();
        if channels.lines.subscribe(
            HandlerId::Loading,
            Arc::new(move |line: &str| {
                load_remover.on_line(connection, line);
            }),
        ) {
            debug!(handler = %HandlerId::Loading, connection, "Line stream hooked");
        }

        let battle_splitter = Arc::clone(&self.battle_splitter);
        if channels.battle_ended.subscribe(
            HandlerId::BattleSplit,
            Arc::new(move |tag: &BattleTag| {
                battle_splitter.on_battle_ended(*tag);
            }),
        ) {
            debug!(handler = %HandlerId::BattleSplit, "Battle end hooked");
        }

        if self.skip_animations() {
            let animation_skipper = Arc::clone(&self.animation_skipper);
            if channels.animation_started.subscribe(
                HandlerId::AnimationSkip,
                Arc::new(move |_: &()| {
                    animation_skipper.on_animation_started();
                }),
            ) {
                debug!(handler = %HandlerId::AnimationSkip, "Battle animation start hooked");
            }
        }

        self.subscribed = true;
        info!(handlers = channels.handler_count(), "Events subscribed!");
    }

    fn unsubscribe_handlers(&mut self) {
        if !self.subscribed {
            return;
        }
        info!("Unsubscribing events...");
        let channels = self.provider.channels();

        channels.battle_ended.unsubscribe(HandlerId::BattleSplit);
        // Unconditional: the flag may have been switched off since subscribing
        if channels
            .animation_started
            .unsubscribe(HandlerId::AnimationSkip)
        {
            debug!(handler = %HandlerId::AnimationSkip, "Battle animation start unhooked");
        }
        channels.lines.unsubscribe(HandlerId::RunStart);
        channels.lines.unsubscribe(HandlerId::Loading);
        self.load_remover.reset();

        self.subscribed = false;
        info!("Events unsubscribed");
    }
}

impl<P: StreamProvider> Drop for Autosplitter<P> {
    fn drop(&mut self) {
        self.unsubscribe_handlers();
    }
}
