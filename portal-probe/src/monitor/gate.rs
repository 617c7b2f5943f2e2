use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Countdown shared by the probes of one round.
///
/// Every probe counts down once when it lands. A conclusive probe first opens
/// the gate outright, so one definitive answer is enough to stop waiting.
#[derive(Debug, Clone)]
pub(crate) struct ProbeGate {
    remaining: Arc<watch::Sender<usize>>,
}

/// How a wait on the gate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateWait {
    Opened,
    TimedOut,
    /// Every probe handle was dropped without the gate opening.
    Interrupted,
}

impl ProbeGate {
    pub(crate) fn new(count: usize) -> (Self, watch::Receiver<usize>) {
        let (tx, rx) = watch::channel(count);
        (
            Self {
                remaining: Arc::new(tx),
            },
            rx,
        )
    }

    /// Open the gate for every waiter, whatever is still running.
    pub(crate) fn release(&self) {
        self.remaining.send_modify(|remaining| *remaining = 0);
    }

    pub(crate) fn count_down(&self) {
        self.remaining
            .send_modify(|remaining| *remaining = remaining.saturating_sub(1));
    }
}

/// Wait for the gate to open, giving up after `limit`.
pub(crate) async fn wait(rx: &mut watch::Receiver<usize>, limit: Duration) -> GateWait {
    let opened = async { rx.wait_for(|remaining| *remaining == 0).await.map(|_| ()) };
    match tokio::time::timeout(limit, opened).await {
        Ok(Ok(())) => GateWait::Opened,
        Ok(Err(_)) => GateWait::Interrupted,
        Err(_) => GateWait::TimedOut,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_opens_after_every_count() {
        let (gate, mut rx) = ProbeGate::new(2);
        gate.count_down();
        assert_eq!(wait(&mut rx, Duration::from_millis(50)).await, GateWait::TimedOut);
        gate.count_down();
        assert_eq!(wait(&mut rx, LIMIT).await, GateWait::Opened);
    }

    #[tokio::test]
    async fn test_release_opens_immediately() {
        let (gate, mut rx) = ProbeGate::new(2);
        gate.release();
        gate.count_down();
        assert_eq!(*rx.borrow(), 0);
        assert_eq!(wait(&mut rx, LIMIT).await, GateWait::Opened);
    }

    #[tokio::test]
    async fn test_release_wakes_pending_waiter() {
        let (gate, mut rx) = ProbeGate::new(2);
        let waiter = tokio::spawn(async move { wait(&mut rx, LIMIT).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        gate.release();
        assert_eq!(waiter.await.unwrap(), GateWait::Opened);
    }

    #[tokio::test]
    async fn test_dropped_gate_interrupts_waiter() {
        let (gate, mut rx) = ProbeGate::new(2);
        gate.count_down();
        drop(gate);
        assert_eq!(wait(&mut rx, LIMIT).await, GateWait::Interrupted);
    }
}
