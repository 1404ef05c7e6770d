/// Outcome of a task that may be cut short
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AbortResult<T, U> {
    Completed(T),
    Aborted(U),
}

impl<T, U> AbortResult<T, U> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}
