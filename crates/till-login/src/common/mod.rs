mod digits;
mod task;
mod timer;

pub use digits::DigitSlots;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};
pub use timer::{Generation, Timer, TimerKind};
