pub mod calendar;
pub mod error;
pub mod identifiers;
pub mod records;
pub mod summary;
pub mod timestamp;

pub use calendar::{build_date_index, schedules_on, DayMarking};
pub use error::{DomainError, DomainResult};
pub use identifiers::{RecordId, UserId};
pub use records::{Folder, Note, Schedule, Task, UserProfile};
pub use summary::{summarize, summarize_today, tasks_per_weekday, StatusFilter, TaskFilter, TaskSummary};
pub use timestamp::Timestamp;
