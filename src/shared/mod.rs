pub mod errors;
pub mod shutdown;
pub mod telemetry;

pub use errors::{DomainError, DomainResult};
pub use shutdown::{ShutdownNotified, ShutdownSignal};
pub use telemetry::init_tracing;
