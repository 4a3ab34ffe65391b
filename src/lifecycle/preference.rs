use std::cell::RefCell;
use std::rc::Rc;

/// User motion preference.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    pub fn is_reduced(self) -> bool {
        self == Self::Reduced
    }
}

/// Handle returned by [`MotionPreferenceSource::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with the new preference.
pub type PreferenceListener = Box<dyn Fn(MotionPreference)>;

/// Platform query for the reduced-motion setting.
pub trait MotionPreferenceSource {
    /// Current value.
    fn get(&self) -> MotionPreference;

    /// Register `listener` for changes.
    fn subscribe(&self, listener: PreferenceListener) -> SubscriptionId;

    /// Drop a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct Inner {
    value: MotionPreference,
    listeners: Vec<(SubscriptionId, PreferenceListener)>,
    next_id: u64,
}

/// In-process preference source; clones share state.
///
/// Hosts forward the platform's media-query change events into [`set`](Self::set).
#[derive(Clone, Default)]
pub struct SharedMotionPreference {
    inner: Rc<RefCell<Inner>>,
}

impl SharedMotionPreference {
    pub fn new(value: MotionPreference) -> Self {
        let s = Self::default();
        s.inner.borrow_mut().value = value;
        s
    }

    /// Change the value, notifying listeners if it differs.
    pub fn set(&self, value: MotionPreference) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
        }
        tracing::debug!(?value, "motion preference changed");
        let inner = self.inner.borrow();
        for (_, listener) in &inner.listeners {
            listener(value);
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl std::fmt::Debug for SharedMotionPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SharedMotionPreference")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl MotionPreferenceSource for SharedMotionPreference {
    fn get(&self) -> MotionPreference {
        self.inner.borrow().value
    }

    fn subscribe(&self, listener: PreferenceListener) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().listeners.retain(|(i, _)| *i != id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/preference.rs"]
mod tests;
