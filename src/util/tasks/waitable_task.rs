use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

pub(in crate::util::tasks) struct SharedState<T> {
    pub(in crate::util::tasks) result: Option<T>,
    pub(in crate::util::tasks) wakers: Vec<Waker>,
}

impl<T> SharedState<T> {
    pub(in crate::util::tasks) fn pending() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(SharedState {
            result: None,
            wakers: Vec::with_capacity(4),
        }))
    }
}

pub(in crate::util::tasks) fn lock_state<T>(
    state: &Mutex<SharedState<T>>,
) -> MutexGuard<'_, SharedState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Stores the result unless one is already present, then wakes every waiter.
/// Returns false if the task had already finished.
pub(in crate::util::tasks) fn set_result<T>(mut lock: MutexGuard<SharedState<T>>, result: T) -> bool {
    if lock.result.is_some() {
        return false;
    }

    lock.result = Some(result);
    let wakers = mem::take(&mut lock.wakers);
    drop(lock);
    wakers.into_iter().for_each(Waker::wake);
    true
}

/// A cloneable future resolving to the value handed to its finisher.
/// Any number of waiters may await the same task.
pub struct WaitableTask<T>(pub(in crate::util::tasks) Arc<Mutex<SharedState<T>>>);

pub struct WaitableTaskFinisher<T>(WaitableTask<T>);

impl<T> Clone for WaitableTask<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> WaitableTask<T> {
    pub fn new() -> (Self, WaitableTaskFinisher<T>) {
        let task = Self(SharedState::pending());
        (task.clone(), WaitableTaskFinisher(task))
    }

    pub fn is_ready(&self) -> bool {
        lock_state(&self.0).result.is_some()
    }
}

impl<T: Clone> Future for WaitableTask<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut lock = lock_state(&self.0);
        match &lock.result {
            Some(result) => Poll::Ready(result.clone()),
            None => {
                if !lock.wakers.iter().any(|w| cx.waker().will_wake(w)) {
                    lock.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

pub trait TaskFinisher<T> {
    fn finish(self, result: T);
}

impl<T> TaskFinisher<T> for WaitableTaskFinisher<T> {
    fn finish(self, result: T) {
        set_result(lock_state(&self.0 .0), result);
    }
}
