use futures::future::FusedFuture;
use parking_lot::Mutex;
use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll, Waker},
};

// One-shot flag shared by a single sender and any number of receivers.
// Receivers are futures resolving once the flag is signaled, usable
// directly inside select! loops.
#[derive(Debug)]
struct Inner {
    signaled: AtomicBool,
    wakers: Mutex<Vec<Waker>>,
}
impl Inner {
    fn new() -> Self {
        let signaled = false;
        let signaled = AtomicBool::new(signaled);

        let wakers = Vec::new();
        let wakers = Mutex::new(wakers);

        Self { signaled, wakers }
    }

    fn signal(&self) {
        let mut wakers = self.wakers.lock();

        let already_signaled = self.signaled.swap(true, Ordering::SeqCst);
        debug_assert!(!already_signaled, "flag already signaled");

        wakers.drain(..).for_each(|waker| waker.wake());
    }
}

#[derive(Debug)]
pub struct Sender {
    inner: Arc<Inner>,
}
impl Sender {
    pub fn new() -> Self {
        let inner = Inner::new();
        let inner = Arc::new(inner);

        Self { inner }
    }

    pub fn receiver(&self) -> Receiver {
        Receiver {
            inner: self.inner.clone(),
            completed: false,
        }
    }

    pub fn signal(self) {
        self.inner.signal();
    }
}

#[derive(Debug)]
pub struct Receiver {
    inner: Arc<Inner>,
    completed: bool,
}
impl Clone for Receiver {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            completed: false,
        }
    }
}
impl Future for Receiver {
    type Output = ();

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        let self_ = self.get_mut();

        if self_.completed {
            return Poll::Pending;
        }

        if self_.inner.signaled.load(Ordering::SeqCst) {
            self_.completed = true;
            return Poll::Ready(());
        }

        let mut wakers = self_.inner.wakers.lock();
        // signal() holds the lock while setting the flag, re-check under it
        if self_.inner.signaled.load(Ordering::SeqCst) {
            drop(wakers);
            self_.completed = true;
            return Poll::Ready(());
        }
        if !wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        drop(wakers);

        Poll::Pending
    }
}
impl FusedFuture for Receiver {
    fn is_terminated(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::poll;

    #[tokio::test]
    async fn pending_until_signaled() {
        let sender = Sender::new();
        let mut receiver = sender.receiver();

        assert!(poll!(&mut receiver).is_pending());
        assert!(!receiver.is_terminated());

        sender.signal();

        assert!(poll!(&mut receiver).is_ready());
        assert!(receiver.is_terminated());
    }

    #[tokio::test]
    async fn clone_resolves_independently() {
        let sender = Sender::new();
        let receiver_1 = sender.receiver();
        let mut receiver_2 = receiver_1.clone();

        sender.signal();

        assert!(poll!(&mut receiver_2).is_ready());

        let mut receiver_3 = receiver_2.clone();
        assert!(poll!(&mut receiver_3).is_ready());
    }
}
