//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

//-------------------------------------------------------------------------------------------------------------------

/// Callback answering client invocations of a [`RemoteFunctionServer`].
pub type ServerInvokeHandler = Arc<dyn Fn(&Client, Args) -> Args + Send + Sync + 'static>;

struct RemoteFunctionServerInner
{
    name: String,
    server: Weak<ServerInner>,
    handler: Mutex<Option<ServerInvokeHandler>>,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Named request/response function owned by a [`Server`], callable in both directions.
#[derive(Clone)]
pub struct RemoteFunctionServer
{
    inner: Arc<RemoteFunctionServerInner>,
}

impl RemoteFunctionServer
{
    pub(crate) fn new(name: String, server: Weak<ServerInner>) -> Self
    {
        Self{
            inner: Arc::new(RemoteFunctionServerInner{
                name,
                server,
                handler: Mutex::new(None),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    pub fn name(&self) -> &str
    {
        &self.inner.name
    }

    /// Sets the callback that answers [`RemoteFunctionClient::invoke_server`].
    pub fn set_on_server_invoke(&self, handler: impl Fn(&Client, Args) -> Args + Send + Sync + 'static)
    {
        match self.inner.handler.lock()
        {
            Ok(mut current) => *current = Some(Arc::new(handler)),
            Err(_) => tracing::error!("remote function server handler mutex is broken"),
        }
    }

    pub fn clear_on_server_invoke(&self)
    {
        match self.inner.handler.lock()
        {
            Ok(mut current) => *current = None,
            Err(_) => tracing::error!("remote function server handler mutex is broken"),
        }
    }

    /// Sends a request to one client and blocks until it responds.
    ///
    /// Invocations of different clients are correlated independently and may run concurrently.
    pub fn invoke_client(&self, client: &Client, args: Args) -> Result<Args, BridgeError>
    {
        self.check_alive()?;
        let Some(server) = self.inner.server.upgrade()
        else { return Err(BridgeError::UseAfterDestroy("Server")); };

        if !client.belongs_to(&self.inner.server)
        {
            return Err(BridgeError::InvalidArgument(format!("client {} belongs to another server", client.id())));
        }

        let timeout = server.config.invoke_timeout;
        drop(server);

        client.invoke(&self.inner.name, args, timeout)
    }

    /// Detaches the function, retracts every client mirror and cancels every invocation pending on it.
    ///
    /// Does nothing if already destroyed.
    pub fn destroy(&self)
    {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) { return; }

        tracing::debug!(name = %self.inner.name, "destroying remote function");
        if let Some(server) = self.inner.server.upgrade()
        {
            server.retract_function(self);
        }
        self.clear_on_server_invoke();
    }

    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    fn check_alive(&self) -> Result<(), BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("RemoteFunctionServer")); }
        Ok(())
    }

    /// Runs the invoke handler for a client request.
    pub(crate) fn answer(&self, client: &Client, args: Args) -> Reply
    {
        if self.is_destroyed() { return Reply::Unknown; }

        let handler = match self.inner.handler.lock()
        {
            Ok(handler) => handler.clone(),
            Err(_) => { tracing::error!("remote function server handler mutex is broken"); None }
        };

        match handler
        {
            Some(handler) => Reply::Values((handler)(client, args)),
            None =>
            {
                tracing::debug!(client_id = %client.id(), name = %self.inner.name, "client invoked a function with no handler");
                Reply::Unhandled
            }
        }
    }

    /// Marks the function destroyed without touching the registry.
    pub(crate) fn mark_destroyed(&self)
    {
        self.inner.destroyed.store(true, Ordering::Release);
        self.clear_on_server_invoke();
    }
}

impl PartialEq for RemoteFunctionServer
{
    fn eq(&self, other: &Self) -> bool
    {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for RemoteFunctionServer {}

impl std::fmt::Debug for RemoteFunctionServer
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("RemoteFunctionServer")
            .field("name", &self.inner.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
