//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

//-------------------------------------------------------------------------------------------------------------------

pub(crate) struct ServerInner
{
    pub(crate) config: BridgeConfig,
    registry: Mutex<Registry>,
}

impl ServerInner
{
    fn registry(&self) -> MutexGuard<'_, Registry>
    {
        match self.registry.lock()
        {
            Ok(registry) => registry,
            Err(poisoned) =>
            {
                tracing::error!("server registry mutex is broken");
                poisoned.into_inner()
            }
        }
    }

    /// Sends a frame to every connected client.
    ///
    /// Called with the registry locked so announcements keep their order relative to fires.
    fn announce(registry: &Registry, packet: &Packet)
    {
        let frame = match packet.encode()
        {
            Ok(frame) => frame,
            Err(err) => { tracing::error!(?err, "failed serializing announcement"); return; }
        };

        for client in registry.clients()
        {
            if let Err(err) = client.send_frame(frame.clone())
            {
                tracing::warn!(?err, client_id = %client.id(), "failed announcing to client");
            }
        }
    }

    pub(crate) fn detach_client(&self, client: &Client)
    {
        if self.registry().remove_client(client)
        {
            tracing::debug!(client_id = %client.id(), "client detached from server");
        }
    }

    /// Snapshot of the connected clients.
    pub(crate) fn connected_clients(&self) -> Result<Vec<Client>, BridgeError>
    {
        let registry = self.registry();
        registry.check_alive()?;
        Ok(registry.clients().cloned().collect())
    }

    pub(crate) fn retract_event(&self, event: &RemoteEventServer)
    {
        let mut registry = self.registry();
        if !registry.remove_event(event) { return; }

        Self::announce(&registry, &Packet::Retract{ kind: RemoteKind::Event, name: String::from(event.name()) });
    }

    pub(crate) fn retract_function(&self, function: &RemoteFunctionServer)
    {
        let clients: Vec<Client> = {
            let mut registry = self.registry();
            if !registry.remove_function(function) { return; }

            Self::announce(&registry, &Packet::Retract{ kind: RemoteKind::Function, name: String::from(function.name()) });
            registry.clients().cloned().collect()
        };

        for client in clients
        {
            client.cancel_invocations(function.name());
        }
    }

    /// Routes a frame that arrived from `client`.
    pub(crate) fn handle_client_frame(&self, client: &Client, data: &[u8])
    {
        if !client.is_connected()
        {
            tracing::trace!(client_id = %client.id(), "dropping frame from disconnected client");
            return;
        }

        let Some(packet) = Packet::decode(data) else { return; };

        match packet
        {
            Packet::Event{ name, args } =>
            {
                let event = self.registry().event(&name).cloned();
                let Some(event) = event
                else { tracing::warn!(client_id = %client.id(), name = %name, "dropping client event for unknown remote event"); return; };

                tracing::trace!(client_id = %client.id(), name = %name, "client fired server");
                event.dispatch_from_client(client.clone(), args);
            }
            Packet::Request{ name, token, client: origin, args } =>
            {
                if origin != *client.id()
                {
                    tracing::warn!(client_id = %client.id(), origin = %origin, token, "request origin does not match its channel");
                }

                let function = self.registry().function(&name).cloned();
                let caller = client.clone();
                respond_in_background(client.channel(), name, token,
                    move ||
                    {
                        match function
                        {
                            Some(function) => function.answer(&caller, args),
                            None           => Reply::Unknown,
                        }
                    }
                );
            }
            Packet::Response{ token, reply } =>
            {
                client.resolve(token, reply);
            }
            Packet::Declare{ kind, name } | Packet::Retract{ kind, name } =>
            {
                tracing::warn!(client_id = %client.id(), %kind, name = %name, "ignoring declaration sent by a client");
            }
        }
    }

    fn shutdown(&self)
    {
        let (clients, events, functions) = {
            let mut registry = self.registry();
            if registry.is_destroyed() { return; }
            registry.take_all()
        };

        tracing::debug!(clients = clients.len(), events = events.len(), functions = functions.len(), "destroying server");

        for event in events { event.mark_destroyed(); }
        for function in functions { function.mark_destroyed(); }
        for client in clients { client.disconnect(); }
    }
}

impl Drop for ServerInner
{
    fn drop(&mut self)
    {
        self.shutdown();
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// The authoritative end of the bridge.
///
/// Owns every connected [`Client`] and every named [`RemoteEventServer`] and [`RemoteFunctionServer`].
/// Primitives are announced to each client endpoint, which mirrors them as [`RemoteEventClient`] and
/// [`RemoteFunctionClient`].
///
/// Cloning the handle is cheap. The server is destroyed when [`Server::destroy`] is called or the last
/// handle is dropped.
#[derive(Clone)]
pub struct Server
{
    inner: Arc<ServerInner>,
}

impl Server
{
    /// Makes a server and connects each of `clients` over a [`MockChannel`].
    ///
    /// Fails with `BridgeError::InvalidArgument` on an empty name or a repeated id.
    pub fn new<I>(clients: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator,
        I::Item: Into<ClientId>,
    {
        Self::with_config(clients, BridgeConfig::default())
    }

    /// Makes a server with an explicit config.
    pub fn with_config<I>(clients: I, config: BridgeConfig) -> Result<Self, BridgeError>
    where
        I: IntoIterator,
        I::Item: Into<ClientId>,
    {
        let ids: Vec<ClientId> = clients.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for id in ids.iter()
        {
            if !id.is_well_formed() { return Err(BridgeError::InvalidArgument(format!("malformed client id {:?}", id))); }
            if !seen.insert(id) { return Err(BridgeError::InvalidArgument(format!("client id {} listed twice", id))); }
        }

        tracing::debug!(?config, clients = ids.len(), "creating server");
        let registry = Registry::new(config.departed_capacity);
        let server = Self{ inner: Arc::new(ServerInner{ config, registry: Mutex::new(registry) }) };

        for id in ids
        {
            server.connect(id)?;
        }

        Ok(server)
    }

    pub fn config(&self) -> &BridgeConfig
    {
        &self.inner.config
    }

    /// Registers a new remote event and announces it to every client, current and future.
    pub fn create_remote_event(&self, name: impl Into<String>) -> Result<RemoteEventServer, BridgeError>
    {
        let name = name.into();
        let event = RemoteEventServer::new(name.clone(), Arc::downgrade(&self.inner));

        let mut registry = self.inner.registry();
        registry.check_alive()?;
        if name.is_empty() { return Err(BridgeError::InvalidArgument(String::from("remote event name is empty"))); }
        registry.register_event(event.clone())?;

        tracing::debug!(name = %name, "created remote event");
        ServerInner::announce(&registry, &Packet::Declare{ kind: RemoteKind::Event, name });
        Ok(event)
    }

    /// Registers a new remote function and announces it to every client, current and future.
    pub fn create_remote_function(&self, name: impl Into<String>) -> Result<RemoteFunctionServer, BridgeError>
    {
        let name = name.into();
        let function = RemoteFunctionServer::new(name.clone(), Arc::downgrade(&self.inner));

        let mut registry = self.inner.registry();
        registry.check_alive()?;
        if name.is_empty() { return Err(BridgeError::InvalidArgument(String::from("remote function name is empty"))); }
        registry.register_function(function.clone())?;

        tracing::debug!(name = %name, "created remote function");
        ServerInner::announce(&registry, &Packet::Declare{ kind: RemoteKind::Function, name });
        Ok(function)
    }

    pub fn get_remote_event(&self, name: &str) -> Result<RemoteEventServer, BridgeError>
    {
        let registry = self.inner.registry();
        registry.check_alive()?;
        registry.event(name)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound{ kind: RemoteKind::Event, name: String::from(name) })
    }

    pub fn get_remote_function(&self, name: &str) -> Result<RemoteFunctionServer, BridgeError>
    {
        let registry = self.inner.registry();
        registry.check_alive()?;
        registry.function(name)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound{ kind: RemoteKind::Function, name: String::from(name) })
    }

    /// Connects an in-process client endpoint over a new [`MockChannel`].
    pub fn connect(&self, id: impl Into<ClientId>) -> Result<Client, BridgeError>
    {
        self.connect_with(id, MockChannel::pair())
    }

    /// Connects an in-process client endpoint over `pair`.
    ///
    /// The endpoint is built on `pair.client` and is reachable through [`Client::endpoint`].
    pub fn connect_with(&self, id: impl Into<ClientId>, pair: ChannelPair) -> Result<Client, BridgeError>
    {
        let id = id.into();
        self.inner.registry().check_client_free(&id)?;

        let endpoint = ClientEndpoint::new(id.clone(), pair.client, self.inner.config.clone());
        match self.connect_inner(id, pair.server, Some(endpoint.clone()))
        {
            Ok(client) => Ok(client),
            Err(err) => { endpoint.close(); Err(err) }
        }
    }

    /// Connects a client endpoint that lives elsewhere, reached through the server end of its channel.
    pub fn accept(&self, id: impl Into<ClientId>, channel: Arc<dyn Channel>) -> Result<Client, BridgeError>
    {
        self.connect_inner(id.into(), channel, None)
    }

    fn connect_inner(
        &self,
        id       : ClientId,
        channel  : Arc<dyn Channel>,
        endpoint : Option<ClientEndpoint>,
    ) -> Result<Client, BridgeError>
    {
        if !id.is_well_formed() { return Err(BridgeError::InvalidArgument(format!("malformed client id {:?}", id))); }

        let client = Client::new(id, Arc::downgrade(&self.inner), channel, endpoint);
        {
            let mut registry = self.inner.registry();
            registry.register_client(client.clone())?;

            if self.inner.config.announce_on_connect
            {
                for declaration in registry.declarations()
                {
                    if let Err(err) = client.send(&declaration)
                    {
                        tracing::warn!(?err, client_id = %client.id(), "failed announcing to new client");
                    }
                }
            }
        }

        client.attach(&self.inner);
        tracing::debug!(client_id = %client.id(), "client connected");

        Ok(client)
    }

    /// Disconnects a client.
    ///
    /// Does nothing if the client was connected before and already left. Fails with
    /// `BridgeError::ClientNotFound` if the id was never connected.
    pub fn disconnect(&self, id: impl Into<ClientId>) -> Result<(), BridgeError>
    {
        let id = id.into();
        let client = {
            let registry = self.inner.registry();
            registry.check_alive()?;
            match registry.client(&id)
            {
                Some(client) => client.clone(),
                None if registry.was_connected(&id) => return Ok(()),
                None => return Err(BridgeError::ClientNotFound(id)),
            }
        };

        client.disconnect();
        Ok(())
    }

    pub fn get_client(&self, id: impl Into<ClientId>) -> Result<Client, BridgeError>
    {
        let id = id.into();
        let registry = self.inner.registry();
        registry.check_alive()?;
        registry.client(&id).cloned().ok_or(BridgeError::ClientNotFound(id))
    }

    /// Snapshot of the connected clients keyed by id.
    pub fn get_clients_mapped(&self) -> Result<HashMap<ClientId, Client>, BridgeError>
    {
        let registry = self.inner.registry();
        registry.check_alive()?;
        Ok(registry.clients().map(|client| (client.id().clone(), client.clone())).collect())
    }

    /// Snapshot of the connected clients sorted by id.
    pub fn get_clients_listed(&self) -> Result<Vec<Client>, BridgeError>
    {
        let mut clients = self.inner.connected_clients()?;
        clients.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(clients)
    }

    /// Disconnects every client and destroys every primitive.
    ///
    /// Afterwards every server operation fails with `BridgeError::UseAfterDestroy`. Does nothing if
    /// already destroyed.
    pub fn destroy(&self)
    {
        self.inner.shutdown();
    }

    pub fn is_destroyed(&self) -> bool
    {
        self.inner.registry().is_destroyed()
    }
}

impl std::fmt::Debug for Server
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Server")
            .field("config", &self.inner.config)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

//-------------------------------------------------------------------------------------------------------------------
