use super::waitable_task::{lock_state, set_result, SharedState, TaskFinisher, WaitableTask};
use crate::util::AbortResult;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

/// A waitable task that can be asked to stop early.
///
/// Awaiting it yields `Completed` if the worker finished on its own or `Aborted`
/// if it acknowledged an abort request. The worker listens on the abort waiter
/// and reports through the finisher.
pub struct AbortableTask<T, U> {
    state: Arc<Mutex<SharedState<AbortResult<T, U>>>>,
    abort_waiter: WaitableTask<()>,
}

impl<T, U> Clone for AbortableTask<T, U> {
    fn clone(&self) -> Self {
        AbortableTask {
            state: Arc::clone(&self.state),
            abort_waiter: self.abort_waiter.clone(),
        }
    }
}

impl<T: Clone, U: Clone> Future for AbortableTask<T, U> {
    type Output = AbortResult<T, U>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut waitable_task = self.get_waitable_task();
        Pin::new(&mut waitable_task).poll(cx)
    }
}

impl<T, U> AbortableTask<T, U> {
    pub fn new() -> (Self, AbortableTaskFinisher<T, U>) {
        let task = AbortableTask {
            state: SharedState::pending(),
            abort_waiter: WaitableTask::new().0,
        };
        (task.clone(), AbortableTaskFinisher(task))
    }

    /// Resolves once an abort has been requested
    pub fn get_abort_waiter(&self) -> WaitableTask<()> {
        self.abort_waiter.clone()
    }

    pub fn get_waitable_task(&self) -> WaitableTask<AbortResult<T, U>> {
        WaitableTask(Arc::clone(&self.state))
    }

    pub fn is_abort_requested(&self) -> bool {
        self.abort_waiter.is_ready()
    }

    pub fn is_finished(&self) -> bool {
        lock_state(&self.state).result.is_some()
    }

    /// Requests the worker to stop. Has no effect once the task has finished.
    /// The returned task resolves when the worker has reported back.
    pub fn abort(&self) -> WaitableTask<AbortResult<T, U>> {
        let lock = lock_state(&self.state);
        if lock.result.is_none() {
            set_result(lock_state(&self.abort_waiter.0), ());
        }
        drop(lock);
        self.get_waitable_task()
    }
}

/// Worker side of an [`AbortableTask`]
pub struct AbortableTaskFinisher<T, U>(AbortableTask<T, U>);

impl<T, U> AbortableTaskFinisher<T, U> {
    pub fn is_abort_requested(&self) -> bool {
        self.0.is_abort_requested()
    }

    pub fn aborted(self, result: U) {
        set_result(lock_state(&self.0.state), AbortResult::Aborted(result));
    }
}

impl<T, U> TaskFinisher<T> for AbortableTaskFinisher<T, U> {
    fn finish(self, result: T) {
        set_result(lock_state(&self.0.state), AbortResult::Completed(result));
    }
}
