mod models;

pub use models::{
    ClientDetails,
    ClientDetailsError,
    HostTelemetry,
    LogRecord,
    Section,
    ValidationMode,
    CLIENT_FIELDS,
};
