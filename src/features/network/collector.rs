use crate::shared::traits::DataCollector;
use crate::shared::error::CollectionError;
use crate::features::network::models::NetworkInformation;
use log::debug;
use std::net::IpAddr;
use sysinfo::Networks;

pub struct NetworkCollector {
    networks: Networks,
}

impl NetworkCollector {
    pub fn new() -> Self {
        Self { networks: Networks::new() }
    }
}

impl DataCollector<Vec<NetworkInformation>> for NetworkCollector {
    fn collect(&mut self) -> Result<Vec<NetworkInformation>, CollectionError> {
        self.networks = Networks::new_with_refreshed_list();

        let mut interfaces: Vec<NetworkInformation> = self
            .networks
            .iter()
            .map(|(interface_name, data)| {
                let (ipv4, ipv6): (Vec<IpAddr>, Vec<IpAddr>) = data
                    .ip_networks()
                    .iter()
                    .map(|network| network.addr)
                    .partition(IpAddr::is_ipv4);

                NetworkInformation {
                    interface_name: interface_name.to_string(),
                    mac_address: data.mac_address().to_string(),
                    ipv4_addresses: ipv4.iter().map(ToString::to_string).collect(),
                    ipv6_addresses: ipv6.iter().map(ToString::to_string).collect(),
                    received_bytes: data.total_received(),
                    transmitted_bytes: data.total_transmitted(),
                }
            })
            .collect();
        interfaces.sort_by(|a, b| a.interface_name.cmp(&b.interface_name));
        self.validate()?;

        debug!("Found {} network interfaces", interfaces.len());
        Ok(interfaces)
    }

    fn validate(&self) -> Result<(), CollectionError> {
        if self.networks.list().is_empty() {
            Err(CollectionError::SystemApi("No network interfaces found".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for NetworkCollector {
    fn default() -> Self {
        Self::new()
    }
}
