//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::{HashMap, HashSet, VecDeque};

//-------------------------------------------------------------------------------------------------------------------

/// Everything a server owns, guarded by one mutex inside the server.
///
/// Names are unique per kind: an event and a function may share a name.
pub(crate) struct Registry
{
    destroyed: bool,

    /// [ client id : client ]
    clients: HashMap<ClientId, Client>,
    /// Ids that were connected and are now disconnected. Removed again on reconnect.
    departed: HashSet<ClientId>,
    /// Departure order, oldest first. Holds at most `departed_capacity` ids.
    departed_order: VecDeque<ClientId>,
    departed_capacity: usize,

    /// [ name : event ]
    events: HashMap<String, RemoteEventServer>,
    /// [ name : function ]
    functions: HashMap<String, RemoteFunctionServer>,
}

impl Registry
{
    pub(crate) fn new(departed_capacity: usize) -> Self
    {
        Self{
            destroyed: false,
            clients: HashMap::default(),
            departed: HashSet::default(),
            departed_order: VecDeque::default(),
            departed_capacity,
            events: HashMap::default(),
            functions: HashMap::default(),
        }
    }

    pub(crate) fn check_alive(&self) -> Result<(), BridgeError>
    {
        if self.destroyed { return Err(BridgeError::UseAfterDestroy("Server")); }
        Ok(())
    }

    pub(crate) fn is_destroyed(&self) -> bool
    {
        self.destroyed
    }

    pub(crate) fn check_client_free(&self, id: &ClientId) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if self.clients.contains_key(id) { return Err(BridgeError::DuplicateClient(id.clone())); }
        Ok(())
    }

    pub(crate) fn register_client(&mut self, client: Client) -> Result<(), BridgeError>
    {
        self.check_client_free(client.id())?;

        if self.departed.remove(client.id())
        {
            self.departed_order.retain(|id| id != client.id());
        }
        let _ = self.clients.insert(client.id().clone(), client);
        Ok(())
    }

    /// Removes `client` if it is the one registered under its id.
    pub(crate) fn remove_client(&mut self, client: &Client) -> bool
    {
        let is_registered = self.clients.get(client.id()).map(|r| r == client).unwrap_or(false);
        if !is_registered { return false; }

        let _ = self.clients.remove(client.id());
        self.remember_departed(client.id().clone());
        true
    }

    /// Records a departed id, forgetting the oldest one past capacity.
    fn remember_departed(&mut self, id: ClientId)
    {
        if self.departed_capacity == 0 { return; }
        if !self.departed.insert(id.clone()) { return; }

        self.departed_order.push_back(id);
        while self.departed_order.len() > self.departed_capacity
        {
            let Some(oldest) = self.departed_order.pop_front() else { break; };
            let _ = self.departed.remove(&oldest);
        }
    }

    pub(crate) fn client(&self, id: &ClientId) -> Option<&Client>
    {
        self.clients.get(id)
    }

    pub(crate) fn was_connected(&self, id: &ClientId) -> bool
    {
        self.departed.contains(id)
    }

    pub(crate) fn clients(&self) -> impl Iterator<Item = &Client> + '_
    {
        self.clients.values()
    }

    pub(crate) fn register_event(&mut self, event: RemoteEventServer) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if self.events.contains_key(event.name())
        {
            return Err(BridgeError::DuplicateName{ kind: RemoteKind::Event, name: String::from(event.name()) });
        }

        let _ = self.events.insert(String::from(event.name()), event);
        Ok(())
    }

    pub(crate) fn register_function(&mut self, function: RemoteFunctionServer) -> Result<(), BridgeError>
    {
        self.check_alive()?;
        if self.functions.contains_key(function.name())
        {
            return Err(BridgeError::DuplicateName{ kind: RemoteKind::Function, name: String::from(function.name()) });
        }

        let _ = self.functions.insert(String::from(function.name()), function);
        Ok(())
    }

    pub(crate) fn event(&self, name: &str) -> Option<&RemoteEventServer>
    {
        self.events.get(name)
    }

    pub(crate) fn function(&self, name: &str) -> Option<&RemoteFunctionServer>
    {
        self.functions.get(name)
    }

    pub(crate) fn remove_event(&mut self, event: &RemoteEventServer) -> bool
    {
        let is_registered = self.events.get(event.name()).map(|r| r == event).unwrap_or(false);
        is_registered && self.events.remove(event.name()).is_some()
    }

    pub(crate) fn remove_function(&mut self, function: &RemoteFunctionServer) -> bool
    {
        let is_registered = self.functions.get(function.name()).map(|r| r == function).unwrap_or(false);
        is_registered && self.functions.remove(function.name()).is_some()
    }

    /// Declarations announcing every registered primitive.
    pub(crate) fn declarations(&self) -> Vec<Packet>
    {
        let events = self.events
            .keys()
            .map(|name| Packet::Declare{ kind: RemoteKind::Event, name: name.clone() });
        let functions = self.functions
            .keys()
            .map(|name| Packet::Declare{ kind: RemoteKind::Function, name: name.clone() });

        events.chain(functions).collect()
    }

    /// Marks the registry destroyed and hands back everything it owned.
    pub(crate) fn take_all(&mut self) -> (Vec<Client>, Vec<RemoteEventServer>, Vec<RemoteFunctionServer>)
    {
        self.destroyed = true;
        self.departed.clear();
        self.departed_order.clear();

        (
            self.clients.drain().map(|(_, c)| c).collect(),
            self.events.drain().map(|(_, e)| e).collect(),
            self.functions.drain().map(|(_, f)| f).collect(),
        )
    }
}

//-------------------------------------------------------------------------------------------------------------------
