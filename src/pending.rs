//local shortcuts
use crate::*;

//third-party shortcuts
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};

//standard shortcuts
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

/// How a pending invocation was settled by something other than the caller.
#[derive(Debug)]
pub(crate) enum Resolution
{
    Reply(Reply),
    /// The channel or the client went away.
    Disconnected,
    /// The remote function was destroyed.
    Cancelled,
}

/// Lifecycle of one invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum InvocationState
{
    Pending,
    Fulfilled,
    TimedOut,
    Cancelled,
}

//-------------------------------------------------------------------------------------------------------------------

struct PendingEntry
{
    name: String,
    resolver: Sender<Resolution>,
}

#[derive(Default)]
struct PendingInner
{
    /// Set once the owning link is gone; no new invocations can be registered.
    closed: bool,
    /// [ token : entry ]
    entries: HashMap<u64, PendingEntry>,
}

//-------------------------------------------------------------------------------------------------------------------

/// Correlation-token table for invocations awaiting a response over one channel.
#[derive(Default)]
pub(crate) struct PendingTable
{
    next_token: AtomicU64,
    inner: Mutex<PendingInner>,
}

impl PendingTable
{
    /// Registers a new invocation of `name`.
    ///
    /// Returns `None` if the table was closed.
    pub(crate) fn register(&self, name: &str) -> Option<Invocation>
    {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (resolver, receiver) = bounded(1);

        let Ok(mut inner) = self.inner.lock()
        else { tracing::error!("pending table mutex is broken"); return None; };

        if inner.closed { return None; }

        if inner.entries.insert(token, PendingEntry{ name: String::from(name), resolver }).is_some()
        {
            tracing::error!(token, "correlation token was reused while still pending");
        }

        Some(Invocation{ token, name: String::from(name), receiver, state: InvocationState::Pending })
    }

    /// Settles the invocation with `token`.
    ///
    /// Returns `false` if no invocation is waiting on that token (timed out, cancelled, or never issued).
    pub(crate) fn resolve(&self, token: u64, reply: Reply) -> bool
    {
        let entry = match self.inner.lock()
        {
            Ok(mut inner) => inner.entries.remove(&token),
            Err(_) => { tracing::error!("pending table mutex is broken"); return false; }
        };

        let Some(entry) = entry
        else { tracing::warn!(token, "dropping response for unknown correlation token"); return false; };

        tracing::trace!(token, name = %entry.name, "resolving invocation");
        entry.resolver.try_send(Resolution::Reply(reply)).is_ok()
    }

    /// Releases a token without settling it.
    pub(crate) fn forget(&self, token: u64)
    {
        match self.inner.lock()
        {
            Ok(mut inner) => { let _ = inner.entries.remove(&token); }
            Err(_) => tracing::error!("pending table mutex is broken"),
        }
    }

    /// Cancels every invocation of `name`.
    pub(crate) fn cancel_named(&self, name: &str)
    {
        let cancelled: Vec<PendingEntry> = match self.inner.lock()
        {
            Ok(mut inner) =>
            {
                let tokens: Vec<u64> = inner.entries
                    .iter()
                    .filter(|(_, entry)| entry.name == name)
                    .map(|(token, _)| *token)
                    .collect();
                tokens.iter().filter_map(|token| inner.entries.remove(token)).collect()
            }
            Err(_) => { tracing::error!("pending table mutex is broken"); return; }
        };

        for entry in cancelled
        {
            let _ = entry.resolver.try_send(Resolution::Cancelled);
        }
    }

    /// Closes the table and settles every pending invocation as disconnected.
    pub(crate) fn close(&self)
    {
        let drained: Vec<PendingEntry> = match self.inner.lock()
        {
            Ok(mut inner) =>
            {
                inner.closed = true;
                inner.entries.drain().map(|(_, entry)| entry).collect()
            }
            Err(_) => { tracing::error!("pending table mutex is broken"); return; }
        };

        if !drained.is_empty()
        {
            tracing::debug!(count = drained.len(), "cancelling pending invocations on disconnect");
        }

        for entry in drained
        {
            let _ = entry.resolver.try_send(Resolution::Disconnected);
        }
    }

    pub(crate) fn len(&self) -> usize
    {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// One registered invocation, owned by the blocked caller.
pub(crate) struct Invocation
{
    token: u64,
    name: String,
    receiver: Receiver<Resolution>,
    state: InvocationState,
}

impl Invocation
{
    pub(crate) fn token(&self) -> u64
    {
        self.token
    }

    /// Blocks until the invocation settles or `timeout` elapses.
    ///
    /// `client_id` names the far side of the channel for disconnect errors.
    pub(crate) fn wait(mut self, table: &PendingTable, timeout: Duration, client_id: &ClientId)
        -> Result<Args, BridgeError>
    {
        let result = match self.receiver.recv_timeout(timeout)
        {
            Ok(Resolution::Reply(reply)) =>
            {
                self.state = InvocationState::Fulfilled;
                match reply
                {
                    Reply::Values(args) => Ok(args),
                    Reply::Unknown      => Err(BridgeError::NotFound{ kind: RemoteKind::Function, name: self.name.clone() }),
                    Reply::Unhandled    => Err(BridgeError::NoHandler{ name: self.name.clone() }),
                }
            }
            Ok(Resolution::Disconnected) | Err(RecvTimeoutError::Disconnected) =>
            {
                self.state = InvocationState::Cancelled;
                Err(BridgeError::Disconnected(client_id.clone()))
            }
            Ok(Resolution::Cancelled) =>
            {
                self.state = InvocationState::Cancelled;
                Err(BridgeError::Cancelled{ name: self.name.clone() })
            }
            Err(RecvTimeoutError::Timeout) =>
            {
                table.forget(self.token);
                self.state = InvocationState::TimedOut;
                Err(BridgeError::Timeout{ name: self.name.clone(), after: timeout })
            }
        };

        tracing::trace!(token = self.token, name = %self.name, state = ?self.state, "invocation settled");
        result
    }
}

//-------------------------------------------------------------------------------------------------------------------
