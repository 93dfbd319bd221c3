/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public task service adapter surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod service;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    ConnectionReport,
    DEFAULT_BASE_URL,
    ErrorKind,
    Operation,
    Result,
    TaskClient,
    TaskError,
};

pub use service::TaskService;

// Re-export all types
pub use types::*;
