pub mod fixture;
pub mod logging;

pub use fixture::{DiskStore, Fixture, strings};
pub use logging::{capture_warnings, init_tracing};
