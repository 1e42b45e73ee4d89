//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

/// Client-side state behind a [`ClientEndpoint`].
pub(crate) struct EndpointInner
{
    pub(crate) id: ClientId,
    pub(crate) channel: Arc<dyn Channel>,
    pub(crate) config: BridgeConfig,

    /// Invocations of server functions waiting for a response.
    pub(crate) pending: PendingTable,

    /// Mirrors of server primitives, created when the server declares them.
    /// [ name : mirror ]
    events: Mutex<HashMap<String, RemoteEventClient>>,
    /// [ name : mirror ]
    functions: Mutex<HashMap<String, RemoteFunctionClient>>,
}

impl EndpointInner
{
    fn handle_channel_event(self: &Arc<Self>, event: ChannelEvent)
    {
        let data = match event
        {
            ChannelEvent::Frame(data) => data,
            ChannelEvent::Closed =>
            {
                tracing::debug!(client_id = %self.id, "client endpoint channel closed");
                self.pending.close();
                return;
            }
        };

        let Some(packet) = Packet::decode(&data) else { return; };

        match packet
        {
            Packet::Declare{ kind: RemoteKind::Event, name } =>
            {
                let Ok(mut events) = self.events.lock()
                else { tracing::error!("client endpoint events mutex is broken"); return; };

                tracing::trace!(client_id = %self.id, name = %name, "declaring remote event mirror");
                let mirror = RemoteEventClient::new(name.clone(), Arc::downgrade(self));
                if let Some(previous) = events.insert(name, mirror)
                {
                    tracing::warn!(client_id = %self.id, name = %previous.name(), "remote event redeclared");
                    previous.mark_destroyed();
                }
            }
            Packet::Declare{ kind: RemoteKind::Function, name } =>
            {
                let Ok(mut functions) = self.functions.lock()
                else { tracing::error!("client endpoint functions mutex is broken"); return; };

                tracing::trace!(client_id = %self.id, name = %name, "declaring remote function mirror");
                let mirror = RemoteFunctionClient::new(name.clone(), Arc::downgrade(self));
                if let Some(previous) = functions.insert(name, mirror)
                {
                    tracing::warn!(client_id = %self.id, name = %previous.name(), "remote function redeclared");
                    previous.mark_destroyed();
                }
            }
            Packet::Retract{ kind: RemoteKind::Event, name } =>
            {
                let removed = match self.events.lock()
                {
                    Ok(mut events) => events.remove(&name),
                    Err(_) => { tracing::error!("client endpoint events mutex is broken"); return; }
                };
                if let Some(mirror) = removed { mirror.mark_destroyed(); }
            }
            Packet::Retract{ kind: RemoteKind::Function, name } =>
            {
                let removed = match self.functions.lock()
                {
                    Ok(mut functions) => functions.remove(&name),
                    Err(_) => { tracing::error!("client endpoint functions mutex is broken"); return; }
                };
                if let Some(mirror) = removed { mirror.mark_destroyed(); }
                self.pending.cancel_named(&name);
            }
            Packet::Event{ name, args } =>
            {
                let Some(mirror) = self.remote_event(&name)
                else { tracing::warn!(client_id = %self.id, name = %name, "dropping event for undeclared remote event"); return; };

                mirror.dispatch_from_server(args);
            }
            Packet::Request{ name, token, client, args } =>
            {
                if client != self.id
                {
                    tracing::warn!(client_id = %self.id, target = %client, token, "request addressed to another client");
                }

                let mirror = self.remote_function(&name);
                respond_in_background(self.channel.clone(), name, token,
                    move ||
                    {
                        match mirror
                        {
                            Some(mirror) => mirror.answer(args),
                            None         => Reply::Unknown,
                        }
                    }
                );
            }
            Packet::Response{ token, reply } =>
            {
                self.pending.resolve(token, reply);
            }
        }
    }

    pub(crate) fn remote_event(&self, name: &str) -> Option<RemoteEventClient>
    {
        let Ok(events) = self.events.lock()
        else { tracing::error!("client endpoint events mutex is broken"); return None; };

        events.get(name).cloned()
    }

    pub(crate) fn remote_function(&self, name: &str) -> Option<RemoteFunctionClient>
    {
        let Ok(functions) = self.functions.lock()
        else { tracing::error!("client endpoint functions mutex is broken"); return None; };

        functions.get(name).cloned()
    }

    /// Sends a frame to the server, mapping a closed channel to a disconnect.
    pub(crate) fn send(&self, packet: &Packet) -> Result<(), BridgeError>
    {
        match send_packet(&*self.channel, packet)
        {
            Err(BridgeError::Channel(ChannelError::Closed)) => Err(BridgeError::Disconnected(self.id.clone())),
            result => result,
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// The client end of a link: owns the mirrors of the server's remote events and functions.
///
/// In-process endpoints are made by [`Server::connect`] and reached through [`Client::endpoint`]. An
/// endpoint in another process is made with [`ClientEndpoint::new`] over that process's end of the
/// transport.
#[derive(Clone)]
pub struct ClientEndpoint
{
    inner: Arc<EndpointInner>,
}

impl ClientEndpoint
{
    /// Makes an endpoint and starts receiving on `channel`.
    pub fn new(id: impl Into<ClientId>, channel: Arc<dyn Channel>, config: BridgeConfig) -> Self
    {
        let inner = Arc::new(EndpointInner{
            id: id.into(),
            channel,
            config,
            pending: PendingTable::default(),
            events: Mutex::new(HashMap::default()),
            functions: Mutex::new(HashMap::default()),
        });

        let weak = Arc::downgrade(&inner);
        inner.channel.on_receive(Arc::new(
                move |event: ChannelEvent|
                {
                    let Some(inner) = weak.upgrade() else { return; };
                    inner.handle_channel_event(event);
                }
            ));

        Self{ inner }
    }

    pub fn id(&self) -> &ClientId
    {
        &self.inner.id
    }

    pub fn is_open(&self) -> bool
    {
        self.inner.channel.is_open()
    }

    /// Gets the mirror of a server remote event, or `None` if the server has not declared it.
    pub fn get_remote_event(&self, name: &str) -> Option<RemoteEventClient>
    {
        self.inner.remote_event(name)
    }

    /// Gets the mirror of a server remote function, or `None` if the server has not declared it.
    pub fn get_remote_function(&self, name: &str) -> Option<RemoteFunctionClient>
    {
        self.inner.remote_function(name)
    }

    /// Number of `invoke_server` calls waiting for a response.
    pub fn pending_invocations(&self) -> usize
    {
        self.inner.pending.len()
    }

    /// Closes the link. Every pending invocation fails with `BridgeError::Disconnected`.
    pub fn close(&self)
    {
        self.inner.pending.close();
        self.inner.channel.close();
    }
}

impl std::fmt::Debug for ClientEndpoint
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("ClientEndpoint")
            .field("id", &self.inner.id)
            .field("open", &self.is_open())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
