use super::Base;
use parking_lot::RwLock;
use std::any::type_name;

#[derive(Debug)]
struct ValuePending<V> {
    value: Option<V>,
    pending: bool,
}

// Last-value source signal. Every set marks the value pending, so a
// consumer draining with take_pending() observes exactly one pending
// value per publication.
#[derive(Debug)]
pub struct Signal<V: Clone + Send + Sync + 'static> {
    value_pending: RwLock<ValuePending<V>>,
}
impl<V: Clone + Send + Sync + 'static> Signal<V> {
    pub fn new(initial: Option<V>) -> Self {
        let value_pending = ValuePending {
            value: initial,
            pending: false,
        };
        let value_pending = RwLock::new(value_pending);

        Self { value_pending }
    }

    #[must_use = "use this value to wake signals change notifier"]
    pub fn set_one(
        &self,
        value: Option<V>,
    ) -> bool {
        let mut lock = self.value_pending.write();
        *lock = ValuePending {
            value,
            pending: true,
        };
        drop(lock);

        true
    }

    pub fn take_pending(&self) -> Option<Option<V>> {
        let mut lock = self.value_pending.write();
        if !lock.pending {
            return None;
        }
        lock.pending = false;
        let value = lock.value.clone();
        drop(lock);

        Some(value)
    }

    pub fn peek_last(&self) -> Option<V> {
        self.value_pending.read().value.clone()
    }
}
impl<V: Clone + Send + Sync + 'static> Base for Signal<V> {
    fn type_name(&self) -> &'static str {
        type_name::<V>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_across_threads() {
        fn assert_base<S: Base + Send + Sync>(_signal: &S) {}

        let signal = Signal::<f64>::new(None);
        assert_base(&signal);
    }

    #[test]
    fn pending_per_publication() {
        let signal = Signal::<f64>::new(None);
        assert_eq!(signal.take_pending(), None);

        assert!(signal.set_one(Some(1.0)));
        assert_eq!(signal.take_pending(), Some(Some(1.0)));
        assert_eq!(signal.take_pending(), None);
        assert_eq!(signal.peek_last(), Some(1.0));

        // republishing an identical value is still a publication
        assert!(signal.set_one(Some(1.0)));
        assert_eq!(signal.take_pending(), Some(Some(1.0)));
    }
}
