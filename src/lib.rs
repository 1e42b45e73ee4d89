//features
#![cfg_attr(docsrs, feature(doc_cfg))]

//documentation
#![doc = include_str!("../README.md")]
#![allow(unused_imports)]

//module tree
mod channel;
mod client;
mod config;
mod core;
mod error;
mod mock_remote_event;
mod packet;
mod pending;
mod server;
mod signal;

//API exports
pub use crate::channel::*;
pub use crate::client::*;
pub use crate::config::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::mock_remote_event::*;
pub(crate) use crate::packet::*;
pub(crate) use crate::pending::*;
pub use crate::server::*;
pub use crate::signal::*;
