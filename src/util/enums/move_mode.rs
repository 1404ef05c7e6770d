/// Whether a timed move returns before or after its deadline
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MoveMode {
    /// Wait for the move to end before returning
    Synchronous,
    /// Return as soon as the axis is moving, a background task stops it later
    Asynchronous,
}
