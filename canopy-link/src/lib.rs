mod message;
pub use message::*;
mod frame;
pub use frame::*;
mod rpc;
pub use rpc::*;
mod client;
pub use client::*;

pub use tokio_util::sync::CancellationToken;
