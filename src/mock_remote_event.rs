//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

struct MockRemoteEventInner
{
    client: ClientId,
    on_server_event: Signal<(ClientId, Args)>,
    on_client_event: Signal<Args>,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// A remote event with no server and no transport, for unit-testing listeners.
///
/// Fires emit directly on the receiving side's signal, on the calling thread. The single client is fixed
/// at construction.
#[derive(Clone)]
pub struct MockRemoteEvent
{
    inner: Arc<MockRemoteEventInner>,
}

impl MockRemoteEvent
{
    pub fn new(client: impl Into<ClientId>) -> Self
    {
        Self{
            inner: Arc::new(MockRemoteEventInner{
                client: client.into(),
                on_server_event: Signal::new(),
                on_client_event: Signal::new(),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    /// The fixed client.
    pub fn client(&self) -> &ClientId
    {
        &self.inner.client
    }

    pub fn on_server_event(&self) -> &Signal<(ClientId, Args)>
    {
        &self.inner.on_server_event
    }

    pub fn on_client_event(&self) -> &Signal<Args>
    {
        &self.inner.on_client_event
    }

    /// Emits `on_server_event` with the fixed client and `args`.
    pub fn fire_server(&self, args: Args) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        self.inner.on_server_event.emit(&(self.inner.client.clone(), args));
        Ok(())
    }

    /// Emits `on_client_event` with `args`.
    ///
    /// Fails with `BridgeError::ClientNotFound` if `client` is not the fixed client.
    pub fn fire_client(&self, client: &ClientId, args: Args) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if *client != self.inner.client { return Err(BridgeError::ClientNotFound(client.clone())); }

        self.inner.on_client_event.emit(&args);
        Ok(())
    }

    /// Emits `on_client_event` with `args`.
    pub fn fire_all_clients(&self, args: Args) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        self.inner.on_client_event.emit(&args);
        Ok(())
    }

    /// Disconnects every listener. Further fires fail with `BridgeError::UseAfterDestroy`.
    pub fn destroy(&self)
    {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) { return; }

        self.inner.on_server_event.disconnect_all();
        self.inner.on_client_event.disconnect_all();
    }

    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    fn check_alive(&self) -> Result<(), BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("MockRemoteEvent")); }
        Ok(())
    }
}

impl std::fmt::Debug for MockRemoteEvent
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("MockRemoteEvent")
            .field("client", &self.inner.client)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
