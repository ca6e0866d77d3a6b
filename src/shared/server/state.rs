use std::{path::PathBuf, sync::Arc};

use crate::features::user_details::{LogRecord, ValidationMode};
use crate::shared::collector::HostTelemetryCollector;
use crate::shared::traits::DataStorage;

pub type SharedStorage = Arc<dyn DataStorage<LogRecord>>;

pub struct AppState {
    pub storage: SharedStorage,
    pub telemetry: HostTelemetryCollector,
    pub validation_mode: ValidationMode,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        storage: SharedStorage,
        telemetry: HostTelemetryCollector,
        validation_mode: ValidationMode,
        static_dir: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            storage,
            telemetry,
            validation_mode,
            static_dir,
        })
    }
}
