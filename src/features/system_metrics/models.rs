use serde::{Deserialize, Serialize};
use crate::shared::traits::Validatable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInformation {
    pub os: String,
    pub os_version: String,
    pub os_release: String,
    pub architecture: String,
    pub processor: String,
    pub machine: String,
    pub hostname: String,
    pub distro: String,
}

/// Frequencies in MHz across all logical CPUs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuFrequency {
    pub current: u64,
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInformation {
    pub cpu_count: usize,
    pub cpu_freq: Option<CpuFrequency>,
    pub cpu_usage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInformation {
    pub total_memory: u64,
    pub available_memory: u64,
    pub used_memory: u64,
    pub memory_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInformation {
    pub total_disk_space: u64,
    pub used_disk_space: u64,
    pub free_disk_space: u64,
    pub disk_usage_percentage: f64,
}

/// Percentage of `part` in `whole`, rounded to one decimal place.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

impl Validatable for CpuInformation {
    fn validate(&self) -> Result<(), String> {
        if self.cpu_count == 0 {
            return Err("CPU count cannot be zero".to_string());
        }
        if !(0.0..=100.0).contains(&self.cpu_usage) {
            return Err("CPU usage must be between 0 and 100".to_string());
        }
        Ok(())
    }
}

impl Validatable for MemoryInformation {
    fn validate(&self) -> Result<(), String> {
        if self.total_memory == 0 {
            return Err("Total memory cannot be zero".to_string());
        }
        if self.used_memory > self.total_memory {
            return Err("Used memory cannot exceed total memory".to_string());
        }
        Ok(())
    }
}

impl Validatable for DiskInformation {
    fn validate(&self) -> Result<(), String> {
        if self.free_disk_space > self.total_disk_space {
            return Err("Free space cannot exceed total space".to_string());
        }
        Ok(())
    }
}
