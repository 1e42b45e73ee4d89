//module tree
mod client_endpoint;
mod remote_event_client;
mod remote_function_client;

//API exports
pub use crate::client::client_endpoint::*;
pub use crate::client::remote_event_client::*;
pub use crate::client::remote_function_client::*;
