pub use axis_controller::AxisController;
pub use position_tracker::PositionTracker;

mod axis_controller;
mod position_tracker;
