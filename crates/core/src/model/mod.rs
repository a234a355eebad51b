mod course;
mod ids;
mod progress;
mod user;

pub use course::Course;
pub use ids::{CourseId, ParseIdError, UserId};
pub use progress::{
    CourseState, MAX_RETAKES, PASSING_GRADE_MAX, PASSING_GRADE_MIN, ProgressDraft, ProgressError,
    ProgressRecord, RETAKE_GRADE_MAX, RETAKE_GRADE_MIN,
};
pub use user::User;
