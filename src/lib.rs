pub mod features;
pub mod shared;

// Re-export commonly used items from features
pub use features::network::{NetworkCollector, NetworkInformation, PublicIpCollector};
pub use features::system_metrics::{
    CpuCollector,
    CpuFrequency,
    CpuInformation,
    DiskCollector,
    DiskInformation,
    MemoryCollector,
    MemoryInformation,
    SystemInfoCollector,
    SystemInformation,
};
pub use features::user_details::{
    ClientDetails,
    HostTelemetry,
    LogRecord,
    Section,
    ValidationMode,
};

// Re-export shared functionality
pub use shared::collector::{HostTelemetryCollector, TelemetryOptions};
pub use shared::config::{Config, StoreConfig};
pub use shared::error::{ApiError, CollectionError, ConfigError, StorageError};
pub use shared::server::{build_router, serve, AppState};
pub use shared::storage::{ElasticsearchStorage, MemoryStorage, MongoStorage};
pub use shared::traits::{AsyncDataCollector, DataCollector, DataStorage, Validatable};
