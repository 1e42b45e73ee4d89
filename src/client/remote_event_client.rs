//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

//-------------------------------------------------------------------------------------------------------------------

struct RemoteEventClientInner
{
    name: String,
    endpoint: Weak<EndpointInner>,
    on_client_event: Signal<Args>,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Client-side mirror of a [`RemoteEventServer`].
#[derive(Clone)]
pub struct RemoteEventClient
{
    inner: Arc<RemoteEventClientInner>,
}

impl RemoteEventClient
{
    pub(crate) fn new(name: String, endpoint: Weak<EndpointInner>) -> Self
    {
        Self{
            inner: Arc::new(RemoteEventClientInner{
                name,
                endpoint,
                on_client_event: Signal::new(),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    pub fn name(&self) -> &str
    {
        &self.inner.name
    }

    /// Emitted with the arguments of every server fire targeting this client.
    pub fn on_client_event(&self) -> &Signal<Args>
    {
        &self.inner.on_client_event
    }

    /// Sends `args` to the server, which emits them on [`RemoteEventServer::on_server_event`] together with
    /// the originating [`Client`].
    pub fn fire_server(&self, args: Args) -> Result<(), BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("RemoteEventClient")); }

        let Some(endpoint) = self.inner.endpoint.upgrade()
        else { return Err(BridgeError::UseAfterDestroy("ClientEndpoint")); };

        tracing::trace!(client_id = %endpoint.id, name = %self.inner.name, "firing server");
        endpoint.send(&Packet::Event{ name: self.inner.name.clone(), args })
    }

    /// `true` once the server destroyed the event.
    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    pub(crate) fn dispatch_from_server(&self, args: Args)
    {
        if self.is_destroyed() { return; }
        self.inner.on_client_event.emit(&args);
    }

    pub(crate) fn mark_destroyed(&self)
    {
        self.inner.destroyed.store(true, Ordering::Release);
        self.inner.on_client_event.disconnect_all();
    }
}

impl std::fmt::Debug for RemoteEventClient
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("RemoteEventClient")
            .field("name", &self.inner.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
