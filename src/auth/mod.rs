pub mod middleware;

pub use middleware::{AuthError, CronAuth};
