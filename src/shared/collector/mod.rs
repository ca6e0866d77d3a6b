use crate::features::network::{NetworkCollector, PublicIpCollector};
use crate::features::system_metrics::{
    CpuCollector, DiskCollector, MemoryCollector, SystemInfoCollector,
};
use crate::features::user_details::{HostTelemetry, Section};
use crate::shared::error::CollectionError;
use crate::shared::traits::DataCollector;
use log::{info, warn};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct TelemetryOptions {
    pub cpu_sample: Duration,
    pub collect_network: bool,
}

/// Runs every host collector for one request. Individual failures become
/// error placeholders in the returned groups; this never fails as a whole.
pub struct HostTelemetryCollector {
    options: TelemetryOptions,
    public_ip: Option<PublicIpCollector>,
}

impl HostTelemetryCollector {
    pub fn new(options: TelemetryOptions, public_ip: Option<PublicIpCollector>) -> Self {
        Self { options, public_ip }
    }

    /// Blocking: samples CPU usage for the configured window.
    fn collect_local(options: &TelemetryOptions) -> HostTelemetry {
        HostTelemetry {
            system_info: Section::from_result(
                SystemInfoCollector::new().collect(),
                "system info",
            ),
            cpu_info: Section::from_result(
                CpuCollector::new(options.cpu_sample).collect(),
                "CPU info",
            ),
            memory_info: Section::from_result(MemoryCollector::new().collect(), "memory info"),
            disk_info: Section::from_result(DiskCollector::new().collect(), "disk info"),
            network_info: options
                .collect_network
                .then(|| Section::from_result(NetworkCollector::new().collect(), "network info")),
            public_ip_info: None,
        }
    }

    pub async fn collect(&self) -> HostTelemetry {
        let options = self.options.clone();
        let mut telemetry = tokio::task::spawn_blocking(move || Self::collect_local(&options))
            .await
            .unwrap_or_else(|e| {
                warn!("Telemetry task did not complete: {}", e);
                let failed = || CollectionError::SystemApi(format!("telemetry task failed: {e}"));
                HostTelemetry {
                    system_info: Section::from_result(Err(failed()), "system info"),
                    cpu_info: Section::from_result(Err(failed()), "CPU info"),
                    memory_info: Section::from_result(Err(failed()), "memory info"),
                    disk_info: Section::from_result(Err(failed()), "disk info"),
                    network_info: self
                        .options
                        .collect_network
                        .then(|| Section::from_result(Err(failed()), "network info")),
                    public_ip_info: None,
                }
            });

        if let Some(lookup) = &self.public_ip {
            telemetry.public_ip_info =
                Some(Section::from_result(lookup.lookup().await, "public IP info"));
        }

        let failed = telemetry.failed_groups();
        if failed > 0 {
            warn!("{} telemetry group(s) degraded to error placeholders", failed);
        } else {
            info!("Collected host telemetry");
        }
        telemetry
    }
}
