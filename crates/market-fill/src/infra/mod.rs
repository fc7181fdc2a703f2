//! Implementations of the simulator's capabilities on top of an Ethereum node
//! and the 0x v2 exchange contract.

pub mod exchange;
pub mod node;

pub use self::{exchange::Exchange, node::Node};
