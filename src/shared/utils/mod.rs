pub mod clock;
pub mod logger;
pub mod validation;

pub use clock::{Clock, TokioClock};
pub use logger::{init_logger, LogContext, TimedOperation};
pub use validation::Validator;
