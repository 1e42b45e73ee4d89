//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

pub(crate) struct ClientInner
{
    id: ClientId,
    /// Lookup only, the server owns its clients.
    server: Weak<ServerInner>,
    /// Server end of the link.
    channel: Arc<dyn Channel>,
    /// Client end of the link, when the endpoint lives in this process.
    endpoint: Option<ClientEndpoint>,

    /// Invocations of client functions waiting for a response.
    pending: PendingTable,

    connected: AtomicBool,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Server-side handle for one connected client endpoint.
///
/// Cloning the handle is cheap; all clones refer to the same client.
#[derive(Clone)]
pub struct Client
{
    inner: Arc<ClientInner>,
}

impl Client
{
    pub(crate) fn new(
        id       : ClientId,
        server   : Weak<ServerInner>,
        channel  : Arc<dyn Channel>,
        endpoint : Option<ClientEndpoint>,
    ) -> Self
    {
        Self{
            inner: Arc::new(ClientInner{
                id,
                server,
                channel,
                endpoint,
                pending: PendingTable::default(),
                connected: AtomicBool::new(true),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    /// Returns whether `obj` is a [`Client`].
    pub fn is(obj: &dyn Any) -> bool
    {
        obj.is::<Client>()
    }

    pub fn id(&self) -> &ClientId
    {
        &self.inner.id
    }

    /// `true` from connection until [`Client::disconnect`] or [`Client::destroy`].
    pub fn is_connected(&self) -> bool
    {
        self.inner.connected.load(Ordering::Acquire)
    }

    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    /// The in-process endpoint at the other end of this client's link.
    ///
    /// `None` for clients made with [`Server::accept`].
    pub fn endpoint(&self) -> Option<&ClientEndpoint>
    {
        self.inner.endpoint.as_ref()
    }

    /// Gets this client's mirror of a remote event.
    ///
    /// Returns `Ok(None)` if the mirror does not exist yet or the endpoint lives in another process.
    pub fn get_remote_event(&self, name: &str) -> Result<Option<RemoteEventClient>, BridgeError>
    {
        self.check_alive()?;
        Ok(self.inner.endpoint.as_ref().and_then(|e| e.get_remote_event(name)))
    }

    /// Gets this client's mirror of a remote function.
    ///
    /// Returns `Ok(None)` if the mirror does not exist yet or the endpoint lives in another process.
    pub fn get_remote_function(&self, name: &str) -> Result<Option<RemoteFunctionClient>, BridgeError>
    {
        self.check_alive()?;
        Ok(self.inner.endpoint.as_ref().and_then(|e| e.get_remote_function(name)))
    }

    /// Number of `invoke_client` calls on this client waiting for a response.
    pub fn pending_invocations(&self) -> usize
    {
        self.inner.pending.len()
    }

    /// Disconnects the client from the server.
    ///
    /// Closes the link and fails every pending invocation in either direction with
    /// `BridgeError::Disconnected`. Does nothing if already disconnected.
    pub fn disconnect(&self)
    {
        if !self.inner.connected.swap(false, Ordering::AcqRel) { return; }

        tracing::debug!(client_id = %self.inner.id, "disconnecting client");

        if let Some(server) = self.inner.server.upgrade()
        {
            server.detach_client(self);
        }

        self.inner.pending.close();
        match &self.inner.endpoint
        {
            Some(endpoint) => endpoint.close(),
            None           => self.inner.channel.close(),
        }
    }

    /// Disconnects the client and marks it destroyed.
    ///
    /// Further lookups, fires and invocations through this client fail with `BridgeError::UseAfterDestroy`.
    pub fn destroy(&self)
    {
        self.inner.destroyed.store(true, Ordering::Release);
        self.disconnect();
    }

    pub(crate) fn check_alive(&self) -> Result<(), BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("Client")); }
        Ok(())
    }

    fn check_sendable(&self) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if !self.is_connected() { return Err(BridgeError::Disconnected(self.inner.id.clone())); }
        Ok(())
    }

    /// `true` if this client was connected by the server behind `server`.
    pub(crate) fn belongs_to(&self, server: &Weak<ServerInner>) -> bool
    {
        Weak::ptr_eq(&self.inner.server, server)
    }

    fn map_channel_error(&self, err: ChannelError) -> BridgeError
    {
        match err
        {
            ChannelError::Closed => BridgeError::Disconnected(self.inner.id.clone()),
            err                  => BridgeError::Channel(err),
        }
    }

    /// Sends a frame to the client endpoint.
    pub(crate) fn send(&self, packet: &Packet) -> Result<(), BridgeError>
    {
        self.check_sendable()?;
        self.send_frame(packet.encode()?)
    }

    /// Sends an already-encoded frame to the client endpoint.
    pub(crate) fn send_frame(&self, frame: Vec<u8>) -> Result<(), BridgeError>
    {
        self.check_sendable()?;
        self.inner.channel.send(frame).map_err(|err| self.map_channel_error(err))
    }

    /// Invokes a client function and blocks until the endpoint responds.
    pub(crate) fn invoke(&self, name: &str, args: Args, timeout: Duration) -> Result<Args, BridgeError>
    {
        self.check_sendable()?;

        let Some(invocation) = self.inner.pending.register(name)
        else { return Err(BridgeError::Disconnected(self.inner.id.clone())); };
        let token = invocation.token();

        tracing::trace!(client_id = %self.inner.id, name, token, "invoking client");
        let request = Packet::Request{ name: String::from(name), token, client: self.inner.id.clone(), args };
        if let Err(err) = self.send(&request)
        {
            self.inner.pending.forget(token);
            return Err(err);
        }

        invocation.wait(&self.inner.pending, timeout, &self.inner.id)
    }

    /// Cancels every pending invocation of `name` on this client.
    pub(crate) fn cancel_invocations(&self, name: &str)
    {
        self.inner.pending.cancel_named(name);
    }

    /// Installs the server's receive handler on this client's link.
    pub(crate) fn attach(&self, server: &Arc<ServerInner>)
    {
        let server = Arc::downgrade(server);
        let client = Arc::downgrade(&self.inner);

        self.inner.channel.on_receive(Arc::new(
                move |event: ChannelEvent|
                {
                    let Some(client) = client.upgrade() else { return; };
                    let client = Client{ inner: client };

                    match event
                    {
                        ChannelEvent::Closed =>
                        {
                            tracing::debug!(client_id = %client.id(), "client channel closed");
                            client.disconnect();
                        }
                        ChannelEvent::Frame(data) =>
                        {
                            let Some(server) = server.upgrade()
                            else { tracing::trace!(client_id = %client.id(), "dropping frame for dropped server"); return; };
                            server.handle_client_frame(&client, &data);
                        }
                    }
                }
            ));
    }

    /// Resolves a response to one of this client's pending invocations.
    pub(crate) fn resolve(&self, token: u64, reply: Reply)
    {
        self.inner.pending.resolve(token, reply);
    }

    pub(crate) fn channel(&self) -> Arc<dyn Channel>
    {
        self.inner.channel.clone()
    }
}

impl PartialEq for Client
{
    fn eq(&self, other: &Self) -> bool
    {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Client {}

impl std::fmt::Debug for Client
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Client")
            .field("id", &self.inner.id)
            .field("connected", &self.is_connected())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
