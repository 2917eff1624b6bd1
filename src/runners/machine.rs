//! # Single-slot coalescing run-loop.
//!
//! [`Machine`] owns at most one in-flight operation instance. A newer input
//! cancels the active instance's token; the restart is performed by the
//! unwinding run-loop itself, never by the caller, so two instances can
//! never overlap.
//!
//! ## Lifecycle
//! ```text
//! run(input) ──► record input, clear stop
//!      │
//!      ├─ instance active ──► cancel its token, return
//!      │                      (the unwinding loop restarts itself)
//!      └─ idle ─────────────► spawn run-loop
//!
//! run-loop {
//!   ├─► take newest input, install fresh token
//!   ├─► op.run(input, sink, token).await
//!   │       ├─ Ok(out)          ─► candidate result
//!   │       ├─ Err(Canceled)    ─► result absent
//!   │       └─ Err(Fail)        ─► publish Failed, exit
//!   ├─► continue iff *this* token was cancelled and stop not requested
//!   └─► on exit: publish Completed(candidate) unless stop requested
//! }
//! ```
//!
//! ## Rules
//! - The slot (latest input, active token, active flag) is only touched
//!   under its mutex, and the mutex is never held across an await.
//! - The supersession check reads the token that belongs to the finished
//!   iteration, not whatever token is current at decision time.
//! - The completion/failure event is published inside the decision critical
//!   section, so events of a later activation can never overtake it.
//! - Restarting is an explicit loop; a restart storm cannot grow the stack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::OpError;
use crate::events::relay::RelaySender;
use crate::ops::{OpRef, ProgressSink};

/// Latest-input slot; all access goes through [`Inner::slot`]'s mutex.
struct Slot<I> {
    /// Most recent `run()` input not yet picked up by the loop.
    input: Option<I>,
    /// Token of the active instance, if one is running.
    token: Option<CancellationToken>,
    /// True from the moment a run-loop is spawned until it exits.
    active: bool,
}

pub(crate) struct Inner<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    name: Arc<str>,
    op: OpRef<I, O, P>,
    relay: RelaySender<O, P>,
    cfg: Config,
    /// Settable from any caller context; read by the loop at its decision
    /// points. Mutated only inside the slot critical section so that
    /// `stop()`/`run()` and the loop's decision serialize.
    stop: AtomicBool,
    slot: Mutex<Slot<I>>,
}

impl<I, O, P> Inner<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, Slot<I>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The coalescing state machine shared by both runner flavors.
pub(crate) struct Machine<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    inner: Arc<Inner<I, O, P>>,
}

impl<I, O, P> Machine<I, O, P>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    pub(crate) fn new(
        name: Arc<str>,
        op: OpRef<I, O, P>,
        relay: RelaySender<O, P>,
        cfg: Config,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                op,
                relay,
                cfg,
                stop: AtomicBool::new(false),
                slot: Mutex::new(Slot {
                    input: None,
                    token: None,
                    active: false,
                }),
            }),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.inner.name
    }

    /// Records `input` as current and triggers the input-changed protocol.
    ///
    /// Never blocks. With an instance active, only its token is signaled;
    /// the unwinding loop performs the restart against the newest input.
    pub(crate) fn run(&self, input: I) {
        let mut slot = self.inner.lock();
        slot.input = Some(input);
        self.inner.stop.store(false, Ordering::SeqCst);
        if slot.active {
            if let Some(token) = &slot.token {
                token.cancel();
            }
            return;
        }
        slot.active = true;
        drop(slot);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(drive(inner));
    }

    /// Requests a halt: the active instance (if any) is asked to cancel and
    /// its completion event is suppressed. Does not wait for the instance
    /// to unwind.
    pub(crate) fn stop(&self) {
        let slot = self.inner.lock();
        self.inner.stop.store(true, Ordering::SeqCst);
        if slot.active {
            if let Some(token) = &slot.token {
                token.cancel();
            }
        }
    }

    /// True while a run-loop activation is alive (an instance is running
    /// or about to restart).
    pub(crate) fn is_running(&self) -> bool {
        self.inner.lock().active
    }
}

impl<I, O, P> Drop for Machine<I, O, P>
where
    I: Send + 'static,
    O: Send + 'static,
    P: Send + 'static,
{
    fn drop(&mut self) {
        // Let an orphan instance unwind without firing.
        let slot = self.inner.lock();
        self.inner.stop.store(true, Ordering::SeqCst);
        if let Some(token) = &slot.token {
            token.cancel();
        }
    }
}

/// One run-loop activation. Exactly one of these is alive per machine at
/// any time; it is the single logical owner of the restart decision.
async fn drive<I, O, P>(inner: Arc<Inner<I, O, P>>)
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    let mut last: Option<O> = None;
    loop {
        let (input, token) = {
            let mut slot = inner.lock();
            let Some(input) = slot.input.take() else {
                // A restart is only entered after run() recorded a newer
                // input; an empty slot means there is nothing left to do.
                slot.token = None;
                slot.active = false;
                return;
            };
            let token = CancellationToken::new();
            slot.token = Some(token.clone());
            (input, token)
        };

        let sink = instance_sink(&inner, &token);
        let res = inner.op.run(input, sink, token.clone()).await;

        let mut slot = inner.lock();
        // Read supersession off the iteration's own token: a token created
        // by a later restart must not influence this decision.
        let superseded = token.is_cancelled();
        let stop = inner.stop.load(Ordering::SeqCst);
        slot.token = None;

        match res {
            Ok(output) => last = Some(output),
            Err(OpError::Canceled) => {}
            Err(error) => {
                slot.active = false;
                inner.relay.failed(error);
                return;
            }
        }

        if superseded && !stop {
            drop(slot);
            continue;
        }

        slot.active = false;
        if !stop {
            if let Some(output) = last.take() {
                inner.relay.completed(output);
            }
        }
        return;
    }
}

fn instance_sink<I, O, P>(inner: &Arc<Inner<I, O, P>>, token: &CancellationToken) -> ProgressSink<P>
where
    I: Send + 'static,
    O: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    let relay = inner.relay.clone();
    ProgressSink::for_instance(
        Box::new(move |progress| relay.progress(progress)),
        token.clone(),
        inner.cfg.stale_progress,
    )
}
