pub mod config;
pub mod errors;
pub mod greeter;
pub mod telemetry;

pub use config::{GreeterConfig, InvalidEventPolicy, load_config};
pub use errors::{GreeterError, PayloadError, Result};
pub use greeter::{DEFAULT_NAME, Event, Response, handle, handle_value};
