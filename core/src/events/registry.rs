//! Handler registry for provider channels.
//!
//! Each core handler has a fixed [`HandlerId`]. A registry holds at most one
//! handler per id, so subscribing an already subscribed handler and
//! unsubscribing an absent one are both no-ops.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cs3split_types::BattleTag;

/// Callback stored in a [`Registry`].
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identity of a handler slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerId {
    RunStart,
    Loading,
    BattleSplit,
    AnimationSkip,
}

impl HandlerId {
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerId::RunStart => "run_start",
            HandlerId::Loading => "loading",
            HandlerId::BattleSplit => "battle_split",
            HandlerId::AnimationSkip => "animation_skip",
        }
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Registry<T: ?Sized> {
    handlers: Mutex<Vec<(HandlerId, Handler<T>)>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<HandlerId> = self.handlers().iter().map(|(id, _)| *id).collect();
        f.debug_struct("Registry").field("handlers", &ids).finish()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn handlers(&self) -> MutexGuard<'_, Vec<(HandlerId, Handler<T>)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `handler` under `id`. Returns false if `id` is already registered.
    pub fn subscribe(&self, id: HandlerId, handler: Handler<T>) -> bool {
        let mut handlers = self.handlers();
        if handlers.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        handlers.push((id, handler));
        true
    }

    /// Remove the handler registered under `id`. Returns false if there was none.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn is_subscribed(&self, id: HandlerId) -> bool {
        self.handlers().iter().any(|(existing, _)| *existing == id)
    }

    pub fn len(&self) -> usize {
        self.handlers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers().is_empty()
    }

    /// Invoke every handler in subscription order. Returns how many ran.
    ///
    /// Handlers run on a snapshot taken before the first call, without the
    /// registry lock held, so they may block or (un)subscribe.
    pub fn dispatch(&self, value: &T) -> usize {
        let snapshot: Vec<Handler<T>> = self
            .handlers()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &snapshot {
            handler(value);
        }
        snapshot.len()
    }
}

/// The three channels a provider delivers on.
#[derive(Debug, Default)]
pub struct Channels {
    pub lines: Registry<str>,
    pub battle_ended: Registry<BattleTag>,
    pub animation_started: Registry<()>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total handlers registered across all channels.
    pub fn handler_count(&self) -> usize {
        self.lines.len() + self.battle_ended.len() + self.animation_started.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> Handler<str> {
        let counter = Arc::clone(counter);
        Arc::new(move |_line: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let registry = Registry::<str>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        assert!(registry.subscribe(HandlerId::Loading, counting_handler(&hits)));
        assert!(!registry.subscribe(HandlerId::Loading, counting_handler(&hits)));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.dispatch("NOW LOADING Draw Start"), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let registry = Registry::<str>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        assert!(!registry.unsubscribe(HandlerId::RunStart));
        registry.subscribe(HandlerId::RunStart, counting_handler(&hits));
        assert!(registry.unsubscribe(HandlerId::RunStart));
        assert!(!registry.unsubscribe(HandlerId::RunStart));
        assert!(registry.is_empty());

        assert_eq!(registry.dispatch("line"), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_preserves_subscription_order() {
        let registry = Registry::<str>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in [HandlerId::RunStart, HandlerId::Loading] {
            let order = Arc::clone(&order);
            registry.subscribe(
                id,
                Arc::new(move |_line: &str| order.lock().unwrap().push(id)),
            );
        }

        registry.dispatch("exitField");
        assert_eq!(
            *order.lock().unwrap(),
            vec![HandlerId::RunStart, HandlerId::Loading]
        );
    }

    #[test]
    fn test_handler_may_unsubscribe_during_dispatch() {
        let registry = Arc::new(Registry::<()>::new());
        let inner = Arc::clone(&registry);
        registry.subscribe(
            HandlerId::AnimationSkip,
            Arc::new(move |_: &()| {
                inner.unsubscribe(HandlerId::AnimationSkip);
            }),
        );

        assert_eq!(registry.dispatch(&()), 1);
        assert!(registry.is_empty());
    }
}
