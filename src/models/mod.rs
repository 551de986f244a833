pub mod comment;
pub mod completion;
pub mod content;
pub mod course;
pub mod user;

pub use comment::{Comment, CommentResponse};
pub use completion::{CertificateResponse, ContentCompletion};
pub use content::{ContentResponse, CourseContent};
pub use course::{Course, CourseMember, CourseResponse, MemberRole};
pub use user::{User, UserProfile, UserResponse};
