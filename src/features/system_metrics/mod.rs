mod collector;
mod models;

pub use collector::{CpuCollector, DiskCollector, MemoryCollector, SystemInfoCollector};
pub use models::{
    CpuFrequency,
    CpuInformation,
    DiskInformation,
    MemoryInformation,
    SystemInformation,
};
