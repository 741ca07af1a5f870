pub mod equilibrium_instructions;
pub mod rpc;
pub mod utils;
