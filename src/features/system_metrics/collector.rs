use crate::shared::traits::{DataCollector, Validatable};
use crate::shared::error::CollectionError;
use crate::features::system_metrics::models::{
    percentage, CpuFrequency, CpuInformation, DiskInformation, MemoryInformation,
    SystemInformation,
};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

pub struct SystemInfoCollector {
    sys: System,
}

impl SystemInfoCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl DataCollector<SystemInformation> for SystemInfoCollector {
    fn collect(&mut self) -> Result<SystemInformation, CollectionError> {
        self.sys.refresh_cpu_all();

        let os = System::name()
            .ok_or_else(|| CollectionError::SystemApi("OS name unavailable".to_string()))?;
        let architecture = if cfg!(target_pointer_width = "64") { "64bit" } else { "32bit" };
        let hostname = whoami::fallible::hostname()
            .map_err(|e| CollectionError::SystemApi(format!("hostname unavailable: {e}")))?;

        Ok(SystemInformation {
            os,
            os_version: System::long_os_version()
                .or_else(System::os_version)
                .unwrap_or_else(|| String::from("unknown")),
            os_release: System::kernel_version().unwrap_or_else(|| String::from("unknown")),
            architecture: architecture.to_string(),
            processor: self.sys.cpus().first()
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_default(),
            machine: std::env::consts::ARCH.to_string(),
            hostname,
            distro: whoami::distro(),
        })
    }

    fn validate(&self) -> Result<(), CollectionError> {
        match System::name() {
            Some(_) => Ok(()),
            None => Err(CollectionError::SystemApi("OS name unavailable".to_string())),
        }
    }
}

/// Samples CPU usage across `sample` before reporting. A zero window skips
/// the second refresh, in which case usage reads as whatever sysinfo has.
pub struct CpuCollector {
    sys: System,
    sample: Duration,
}

impl CpuCollector {
    pub fn new(sample: Duration) -> Self {
        Self { sys: System::new(), sample }
    }

    fn frequency(&self) -> Option<CpuFrequency> {
        let frequencies: Vec<u64> = self.sys.cpus().iter()
            .map(|cpu| cpu.frequency())
            .filter(|mhz| *mhz > 0)
            .collect();

        let min = *frequencies.iter().min()?;
        let max = *frequencies.iter().max()?;
        let current = frequencies.iter().sum::<u64>() / frequencies.len() as u64;
        Some(CpuFrequency { current, min, max })
    }
}

impl DataCollector<CpuInformation> for CpuCollector {
    fn collect(&mut self) -> Result<CpuInformation, CollectionError> {
        self.sys.refresh_cpu_all();
        if !self.sample.is_zero() {
            std::thread::sleep(self.sample.max(MINIMUM_CPU_UPDATE_INTERVAL));
            self.sys.refresh_cpu_all();
        }
        self.validate()?;

        let usage = self.sys.global_cpu_usage();
        let cpu = CpuInformation {
            cpu_count: self.sys.cpus().len(),
            cpu_freq: self.frequency(),
            cpu_usage: if usage.is_nan() { 0.0 } else { usage.clamp(0.0, 100.0) },
        };
        cpu.validate().map_err(CollectionError::Validation)?;

        debug!("Sampled {} CPUs at {:.1}% usage", cpu.cpu_count, cpu.cpu_usage);
        Ok(cpu)
    }

    fn validate(&self) -> Result<(), CollectionError> {
        if self.sys.cpus().is_empty() {
            Err(CollectionError::SystemApi("No CPU information available".to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl DataCollector<MemoryInformation> for MemoryCollector {
    fn collect(&mut self) -> Result<MemoryInformation, CollectionError> {
        self.sys.refresh_memory();

        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let memory = MemoryInformation {
            total_memory: total,
            available_memory: self.sys.available_memory(),
            used_memory: used,
            memory_percentage: percentage(used, total),
        };
        memory.validate().map_err(CollectionError::Validation)?;
        Ok(memory)
    }

    fn validate(&self) -> Result<(), CollectionError> {
        if self.sys.total_memory() == 0 {
            Err(CollectionError::SystemApi("No memory information available".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Reports usage of the volume mounted at the filesystem root, falling back
/// to the first listed disk when no disk claims the root mount point.
pub struct DiskCollector {
    disks: Disks,
    root: PathBuf,
}

impl DiskCollector {
    pub fn new() -> Self {
        Self {
            disks: Disks::new(),
            root: root_mount_point(),
        }
    }
}

/// Space reserved for root counts as used, so `used + free == total`. psutil
/// instead reports `used = total - f_bfree`.
fn disk_usage(total: u64, free: u64) -> DiskInformation {
    let used = total.saturating_sub(free);
    DiskInformation {
        total_disk_space: total,
        used_disk_space: used,
        free_disk_space: free,
        disk_usage_percentage: percentage(used, total),
    }
}

fn root_mount_point() -> PathBuf {
    if cfg!(target_os = "windows") {
        let drive = std::env::var("SystemDrive").unwrap_or_else(|_| String::from("C:"));
        PathBuf::from(format!("{}\\", drive))
    } else {
        PathBuf::from("/")
    }
}

impl DataCollector<DiskInformation> for DiskCollector {
    fn collect(&mut self) -> Result<DiskInformation, CollectionError> {
        self.disks = Disks::new_with_refreshed_list();
        self.validate()?;

        let disk = self.disks.list().iter()
            .find(|disk| disk.mount_point() == self.root.as_path())
            .or_else(|| self.disks.list().first())
            .ok_or_else(|| CollectionError::SystemApi("No disks found".to_string()))?;

        debug!("Reporting disk usage for {}", disk.mount_point().display());

        let info = disk_usage(disk.total_space(), disk.available_space());
        info.validate().map_err(CollectionError::Validation)?;
        Ok(info)
    }

    fn validate(&self) -> Result<(), CollectionError> {
        if self.disks.list().is_empty() {
            Err(CollectionError::SystemApi("No disks found".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for SystemInfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DiskCollector {
    fn default() -> Self {
        Self::new()
    }
}
