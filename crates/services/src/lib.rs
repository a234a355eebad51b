#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod login_service;
pub mod progress_service;
pub mod view;

pub use plan_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, LoginError, ProgressServiceError};
pub use login_service::LoginService;
pub use progress_service::ProgressService;
pub use view::{CourseNode, CurriculumEdge, CurriculumView};
