pub mod task;
pub mod user;

pub use task::{OwnershipCheck, Task, TaskInput, TaskPatch};
pub use user::User;
