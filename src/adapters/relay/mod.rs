//! Turn relay adapters - transports between client and relay service.

mod http_relay;
mod in_process;
mod mock_relay;

pub use http_relay::HttpTurnRelay;
pub use in_process::InProcessRelay;
pub use mock_relay::MockTurnRelay;
