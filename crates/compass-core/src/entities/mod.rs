//! Normalized records returned by the Compass client.
//!
//! Every record mirrors one upstream JSON shape. Optional fields are `Option`
//! and serialize as an explicit `null`; nothing here references another
//! record; callers resolve ids (e.g. a location id on a calendar event) with
//! a second lookup. All structs derive `JsonSchema` so the declared shapes
//! can be published and validated.

mod academic_group;
mod calendar;
mod campus;
mod feed;
mod group_activity;
mod learning_task;
mod lesson;
mod location;
mod news;
mod staff;
mod subject;
mod task_item;
mod term;
mod user;
mod year_level;

pub use academic_group::AcademicGroup;
pub use calendar::{CalendarEvent, CalendarEventLocation, CalendarEventManager};
pub use campus::Campus;
pub use feed::{AttachmentKind, FeedAttachment, FeedItem, FeedItemAuthor};
pub use group_activity::GroupActivity;
pub use learning_task::{GradingItem, LearningTask, TaskResult};
pub use lesson::{LessonInfo, LessonLocation, LessonPlan, LessonTeacher};
pub use location::Location;
pub use news::{ActivityNewsItem, NewsAuthor};
pub use staff::Staff;
pub use subject::Subject;
pub use task_item::TaskItem;
pub use term::Term;
pub use user::{UserDetails, UserName};
pub use year_level::YearLevel;
