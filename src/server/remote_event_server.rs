//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

//-------------------------------------------------------------------------------------------------------------------

struct RemoteEventServerInner
{
    name: String,
    server: Weak<ServerInner>,
    on_server_event: Signal<(Client, Args)>,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Named fire-and-forget event owned by a [`Server`].
///
/// Every connected client endpoint holds a [`RemoteEventClient`] mirror with the same name.
#[derive(Clone)]
pub struct RemoteEventServer
{
    inner: Arc<RemoteEventServerInner>,
}

impl RemoteEventServer
{
    pub(crate) fn new(name: String, server: Weak<ServerInner>) -> Self
    {
        Self{
            inner: Arc::new(RemoteEventServerInner{
                name,
                server,
                on_server_event: Signal::new(),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    pub fn name(&self) -> &str
    {
        &self.inner.name
    }

    /// Emitted with the originating client and the arguments of every `fire_server` on a mirror.
    pub fn on_server_event(&self) -> &Signal<(Client, Args)>
    {
        &self.inner.on_server_event
    }

    /// Sends `args` to one client's mirror.
    pub fn fire_client(&self, client: &Client, args: Args) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if !client.belongs_to(&self.inner.server)
        {
            return Err(BridgeError::InvalidArgument(format!("client {} belongs to another server", client.id())));
        }

        tracing::trace!(client_id = %client.id(), name = %self.inner.name, "firing client");
        client.send(&Packet::Event{ name: self.inner.name.clone(), args })
    }

    /// Sends `args` to every client connected right now.
    ///
    /// A client whose channel fails is logged and skipped.
    pub fn fire_all_clients(&self, args: Args) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        let Some(server) = self.inner.server.upgrade()
        else { return Err(BridgeError::UseAfterDestroy("Server")); };

        let frame = Packet::Event{ name: self.inner.name.clone(), args }.encode()?;
        let clients = server.connected_clients()?;

        tracing::trace!(name = %self.inner.name, count = clients.len(), "firing all clients");
        for client in clients
        {
            if let Err(err) = client.send_frame(frame.clone())
            {
                tracing::warn!(?err, client_id = %client.id(), name = %self.inner.name, "failed firing client");
            }
        }

        Ok(())
    }

    /// Detaches the event from its server and retracts every client mirror.
    ///
    /// Further fires fail with `BridgeError::UseAfterDestroy`. Does nothing if already destroyed.
    pub fn destroy(&self)
    {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) { return; }

        tracing::debug!(name = %self.inner.name, "destroying remote event");
        if let Some(server) = self.inner.server.upgrade()
        {
            server.retract_event(self);
        }
        self.inner.on_server_event.disconnect_all();
    }

    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    fn check_alive(&self) -> Result<(), BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("RemoteEventServer")); }
        Ok(())
    }

    pub(crate) fn dispatch_from_client(&self, client: Client, args: Args)
    {
        if self.is_destroyed() { return; }
        self.inner.on_server_event.emit(&(client, args));
    }

    /// Marks the event destroyed without touching the registry.
    pub(crate) fn mark_destroyed(&self)
    {
        self.inner.destroyed.store(true, Ordering::Release);
        self.inner.on_server_event.disconnect_all();
    }
}

impl PartialEq for RemoteEventServer
{
    fn eq(&self, other: &Self) -> bool
    {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RemoteEventServer {}

impl std::fmt::Debug for RemoteEventServer
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("RemoteEventServer")
            .field("name", &self.inner.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
