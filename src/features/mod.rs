pub mod network;
pub mod system_metrics;
pub mod user_details;
