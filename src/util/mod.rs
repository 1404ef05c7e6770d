pub use abort_result::*;
pub use enums::*;
pub use result::*;
pub use tasks::*;
pub use time_source::*;

mod abort_result;
mod tasks {
    pub use abortable_task::*;
    pub use waitable_task::*;

    mod abortable_task;
    mod waitable_task;
}

mod enums;
mod result;
mod time_source;
