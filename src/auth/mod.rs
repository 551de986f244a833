pub mod authz;
pub mod jwt;
pub mod middleware;

pub use authz::{find_membership, require_course_teacher, require_membership};
pub use jwt::JwtClaims;
