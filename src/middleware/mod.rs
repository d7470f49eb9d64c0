pub mod auth;
pub mod role;

pub use auth::{AuthUser, RefreshUser};
pub use role::{RequireAdmin, require_clinical_staff};
