//local shortcuts

//third-party shortcuts
use serde::{Deserialize, Serialize};

//standard shortcuts
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// Default bound on how long a blocking invocation waits for its response.
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of departed client ids a server remembers.
pub const DEFAULT_DEPARTED_CAPACITY: usize = 1024;

//-------------------------------------------------------------------------------------------------------------------

/// Config shared by a server, its clients, and in-process client endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BridgeConfig
{
    /// How long `invoke_server` / `invoke_client` wait before failing with `BridgeError::Timeout`.
    pub invoke_timeout: Duration,
    /// Whether newly connected clients are told about every existing primitive.
    ///
    /// Disable this only if the client endpoint declares its mirrors some other way.
    pub announce_on_connect: bool,
    /// How many departed client ids the server remembers, oldest forgotten first.
    ///
    /// `Server::disconnect` is a no-op for a remembered id and fails with `BridgeError::ClientNotFound`
    /// for a forgotten one.
    pub departed_capacity: usize,
}

impl BridgeConfig
{
    pub fn with_invoke_timeout(mut self, invoke_timeout: Duration) -> Self
    {
        self.invoke_timeout = invoke_timeout;
        self
    }
}

impl Default for BridgeConfig
{
    fn default() -> Self
    {
        Self{
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
            announce_on_connect: true,
            departed_capacity: DEFAULT_DEPARTED_CAPACITY,
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------
