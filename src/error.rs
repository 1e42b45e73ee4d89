//local shortcuts
use crate::*;

//third-party shortcuts
use thiserror::Error;

//standard shortcuts
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Errors reported by [`Channel`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError
{
    /// The channel was closed by either end.
    #[error("channel is closed")]
    Closed,

    /// The transport refused the frame.
    #[error("channel rejected frame: {0}")]
    Rejected(String),
}

//-------------------------------------------------------------------------------------------------------------------

/// Errors that can occur while using a server, its clients, or their remote primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError
{
    /// A primitive with this name already exists.
    #[error("a {kind} named {name} already exists")]
    DuplicateName
    {
        kind: RemoteKind,
        name: String,
    },

    /// A client with this id is already connected.
    #[error("client {0} is already connected")]
    DuplicateClient(ClientId),

    /// No primitive is registered under this name.
    #[error("{name} is not a valid {kind}")]
    NotFound
    {
        kind: RemoteKind,
        name: String,
    },

    /// No client has ever been connected with this id.
    #[error("{0} is not a valid client")]
    ClientNotFound(ClientId),

    /// The object was destroyed.
    #[error("{0} was used after being destroyed")]
    UseAfterDestroy(&'static str),

    /// An invocation got no response in time.
    #[error("invocation of {name} timed out after {after:?}")]
    Timeout
    {
        name: String,
        after: Duration,
    },

    /// The client is not connected, or its channel closed while waiting.
    #[error("client {0} is disconnected")]
    Disconnected(ClientId),

    /// The remote function was destroyed while an invocation was pending.
    #[error("invocation of {name} was cancelled")]
    Cancelled
    {
        name: String,
    },

    /// Malformed constructor input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote side has no invoke handler for this function.
    #[error("{name} has no invoke handler on the remote side")]
    NoHandler
    {
        name: String,
    },

    /// Channel failure.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// A frame failed to encode.
    #[error("codec error: {0}")]
    Codec(String),
}

//-------------------------------------------------------------------------------------------------------------------
