//local shortcuts
use crate::*;

//third-party shortcuts
use bincode::Options;
use serde::{Deserialize, Serialize};

//standard shortcuts
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Outcome carried by a response frame.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) enum Reply
{
    /// The handler's return values.
    Values(Args),
    /// The receiving side has no function with the requested name.
    Unknown,
    /// The function exists but has no invoke handler.
    Unhandled,
}

//-------------------------------------------------------------------------------------------------------------------

/// Frame shuttled over a [`Channel`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) enum Packet
{
    /// Server → client: a primitive now exists.
    Declare{ kind: RemoteKind, name: String },
    /// Server → client: a primitive was destroyed.
    Retract{ kind: RemoteKind, name: String },
    /// Fire-and-forget event, either direction.
    Event{ name: String, args: Args },
    /// Function request, either direction.
    /// - `client` is the origin for client requests and the target for server requests.
    Request{ name: String, token: u64, client: ClientId, args: Args },
    /// Response to the request with the same token.
    Response{ token: u64, reply: Reply },
}

impl Packet
{
    pub(crate) fn encode(&self) -> Result<Vec<u8>, BridgeError>
    {
        bincode::DefaultOptions::new()
            .serialize(self)
            .map_err(|err| BridgeError::Codec(err.to_string()))
    }

    pub(crate) fn decode(data: &[u8]) -> Option<Self>
    {
        let Ok(packet) = bincode::DefaultOptions::new().deserialize(data)
        else { tracing::warn!(len = data.len(), "received frame that failed to deserialize"); return None; };

        Some(packet)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Encodes a packet and pushes it onto a channel.
pub(crate) fn send_packet(channel: &dyn Channel, packet: &Packet) -> Result<(), BridgeError>
{
    let data = match packet.encode()
    {
        Ok(data) => data,
        Err(err) => { tracing::error!(?err, "failed serializing frame"); return Err(err); }
    };

    channel.send(data)?;
    Ok(())
}

//-------------------------------------------------------------------------------------------------------------------

/// Answers a request on a worker thread, so the handler may itself invoke across the same channel.
pub(crate) fn respond_in_background(
    channel : Arc<dyn Channel>,
    name    : String,
    token   : u64,
    answer  : impl FnOnce() -> Reply + Send + 'static,
){
    let thread_name = format!("remote-fn-{}", name);
    let job = move ||
    {
        let reply = answer();
        if let Err(err) = send_packet(&*channel, &Packet::Response{ token, reply })
        {
            tracing::warn!(?err, name = %name, token, "failed sending response");
        }
    };

    if let Err(err) = std::thread::Builder::new().name(thread_name).spawn(job)
    {
        tracing::error!(?err, token, "failed spawning request worker; the caller will time out");
    }
}

//-------------------------------------------------------------------------------------------------------------------
