//! One-shot "page intro finished" signal.

use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Bridges the page intro and the widget, whichever side shows up first.
#[derive(Debug, Default)]
pub enum IntroLatch {
    #[default]
    Idle,
    Waiting(oneshot::Sender<()>),
    Finished,
}

impl IntroLatch {
    /// Marks the intro as done. Later calls are no-ops.
    pub fn finish(&mut self) {
        if let IntroLatch::Waiting(tx) = std::mem::replace(self, IntroLatch::Finished) {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, IntroLatch::Finished)
    }

    /// Future that resolves once [`finish`](Self::finish) has been called.
    pub fn gate(&mut self) -> IntroGate {
        if self.is_finished() {
            return IntroGate::ready();
        }
        let (tx, rx) = oneshot::channel();
        *self = IntroLatch::Waiting(tx);
        IntroGate { rx: Some(rx) }
    }
}

/// Resolves when the intro finishes, or when its latch is dropped.
#[derive(Debug)]
pub struct IntroGate {
    rx: Option<oneshot::Receiver<()>>,
}

impl IntroGate {
    pub fn ready() -> Self {
        Self { rx: None }
    }
}

impl Future for IntroGate {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Ready(());
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(_) => {
                self.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
