#![recursion_limit = "256"]

pub mod batch;
pub mod cloud;
pub mod command;
pub mod config;
pub mod inbound;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod telemetry;
pub mod twin;

pub use batch::build_batch;
pub use cloud::link::TcpCloudLink;
pub use cloud::mock::MockCloud;
pub use cloud::{CloudTransport, InboundMessage};
pub use command::{CommandEffect, CommandProcessor};
pub use config::{CloudConfig, Config, GatewayConfig, ServerConfig};
pub use inbound::run_inbound_dispatch;
pub use registry::{DeviceRegistry, default_fleet};
pub use scheduler::Scheduler;
pub use state::{GatewayState, StateSnapshot};
pub use telemetry::{DeviceProfile, Telemetry};
pub use twin::TwinSynchronizer;
