//module tree
mod bridge_server;
mod client;
mod registry;
mod remote_event_server;
mod remote_function_server;

//API exports
pub use crate::server::bridge_server::*;
pub use crate::server::client::*;
pub(crate) use crate::server::registry::*;
pub use crate::server::remote_event_server::*;
pub use crate::server::remote_function_server::*;
