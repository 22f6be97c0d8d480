mod load;
mod parse;
mod record;

pub use load::load_network;
pub use parse::parse_network_payload;
pub use record::{ConnectionRecord, NetworkPayload};
