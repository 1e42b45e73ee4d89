//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

//-------------------------------------------------------------------------------------------------------------------

/// Callback answering server invocations of a [`RemoteFunctionClient`].
pub type ClientInvokeHandler = Arc<dyn Fn(Args) -> Args + Send + Sync + 'static>;

struct RemoteFunctionClientInner
{
    name: String,
    endpoint: Weak<EndpointInner>,
    handler: Mutex<Option<ClientInvokeHandler>>,
    destroyed: AtomicBool,
}

//-------------------------------------------------------------------------------------------------------------------

/// Client-side mirror of a [`RemoteFunctionServer`].
#[derive(Clone)]
pub struct RemoteFunctionClient
{
    inner: Arc<RemoteFunctionClientInner>,
}

impl RemoteFunctionClient
{
    pub(crate) fn new(name: String, endpoint: Weak<EndpointInner>) -> Self
    {
        Self{
            inner: Arc::new(RemoteFunctionClientInner{
                name,
                endpoint,
                handler: Mutex::new(None),
                destroyed: AtomicBool::new(false),
            })
        }
    }

    pub fn name(&self) -> &str
    {
        &self.inner.name
    }

    /// Sets the callback that answers [`RemoteFunctionServer::invoke_client`].
    pub fn set_on_client_invoke(&self, handler: impl Fn(Args) -> Args + Send + Sync + 'static)
    {
        match self.inner.handler.lock()
        {
            Ok(mut current) => *current = Some(Arc::new(handler)),
            Err(_) => tracing::error!("remote function client handler mutex is broken"),
        }
    }

    pub fn clear_on_client_invoke(&self)
    {
        match self.inner.handler.lock()
        {
            Ok(mut current) => *current = None,
            Err(_) => tracing::error!("remote function client handler mutex is broken"),
        }
    }

    /// Sends a request to the server and blocks until it responds.
    ///
    /// Fails with `Timeout` after the configured invoke timeout, `Disconnected` if the link closes while
    /// waiting, and `Cancelled` if the server destroys the function while waiting.
    pub fn invoke_server(&self, args: Args) -> Result<Args, BridgeError>
    {
        if self.is_destroyed() { return Err(BridgeError::UseAfterDestroy("RemoteFunctionClient")); }

        let Some(endpoint) = self.inner.endpoint.upgrade()
        else { return Err(BridgeError::UseAfterDestroy("ClientEndpoint")); };

        let Some(invocation) = endpoint.pending.register(&self.inner.name)
        else { return Err(BridgeError::Disconnected(endpoint.id.clone())); };
        let token = invocation.token();

        tracing::trace!(client_id = %endpoint.id, name = %self.inner.name, token, "invoking server");
        let request = Packet::Request{ name: self.inner.name.clone(), token, client: endpoint.id.clone(), args };
        if let Err(err) = endpoint.send(&request)
        {
            endpoint.pending.forget(token);
            return Err(err);
        }

        invocation.wait(&endpoint.pending, endpoint.config.invoke_timeout, &endpoint.id)
    }

    /// `true` once the server destroyed the function.
    pub fn is_destroyed(&self) -> bool
    {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    /// Runs the invoke handler for a server request.
    pub(crate) fn answer(&self, args: Args) -> Reply
    {
        if self.is_destroyed() { return Reply::Unknown; }

        let handler = match self.inner.handler.lock()
        {
            Ok(handler) => handler.clone(),
            Err(_) => { tracing::error!("remote function client handler mutex is broken"); None }
        };

        match handler
        {
            Some(handler) => Reply::Values((handler)(args)),
            None =>
            {
                tracing::debug!(name = %self.inner.name, "server invoked a client function with no handler");
                Reply::Unhandled
            }
        }
    }

    pub(crate) fn mark_destroyed(&self)
    {
        self.inner.destroyed.store(true, Ordering::Release);
        self.clear_on_client_invoke();
    }
}

impl std::fmt::Debug for RemoteFunctionClient
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("RemoteFunctionClient")
            .field("name", &self.inner.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
