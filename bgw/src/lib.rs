pub mod circuit;
pub mod config;
pub mod field;
pub mod party;
pub mod poly;
pub mod protocol;
pub mod transport;

pub use circuit::{Circuit, Gate, Op, Schedule};
pub use config::{default_degree, resolve_degree, Config, ConfigError};
pub use field::Field;
pub use party::Party;
pub use poly::{recombination, Polynomial};
pub use protocol::{run_protocol, ProtocolError};
pub use transport::{multiparty_channels, ChannelError, Message, MultipartyTransport};
