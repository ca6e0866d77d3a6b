mod collector;
mod models;
mod public_ip;

pub use collector::NetworkCollector;
pub use models::NetworkInformation;
pub use public_ip::PublicIpCollector;
