//local shortcuts

//third-party shortcuts
use crossbeam::channel::bounded;

//standard shortcuts
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

//-------------------------------------------------------------------------------------------------------------------

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

trait Detach: Send + Sync
{
    fn detach(&self, id: u64) -> bool;
    fn contains(&self, id: u64) -> bool;
}

struct SignalInner<T>
{
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
}

impl<T: 'static> Detach for SignalInner<T>
{
    fn detach(&self, id: u64) -> bool
    {
        let Ok(mut listeners) = self.listeners.lock()
        else { tracing::error!("signal listeners mutex is broken"); return false; };

        let len = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != len
    }

    fn contains(&self, id: u64) -> bool
    {
        let Ok(listeners) = self.listeners.lock()
        else { tracing::error!("signal listeners mutex is broken"); return false; };

        listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Handle to one listener connected to a [`Signal`].
///
/// Dropping the handle does not disconnect the listener.
pub struct SignalConnection
{
    id: u64,
    signal: Weak<dyn Detach>,
}

impl SignalConnection
{
    /// Removes the listener from its signal. Does nothing if already disconnected.
    pub fn disconnect(&self)
    {
        if let Some(signal) = self.signal.upgrade()
        {
            signal.detach(self.id);
        }
    }

    pub fn is_connected(&self) -> bool
    {
        self.signal.upgrade().map(|s| s.contains(self.id)).unwrap_or(false)
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// A list of listeners that are called whenever a value is emitted.
///
/// Listeners run on the emitting thread, outside any internal lock, in connection order.
pub struct Signal<T>
{
    inner: Arc<SignalInner<T>>,
}

impl<T: Send + Sync + 'static> Signal<T>
{
    pub fn new() -> Self
    {
        Self{ inner: Arc::new(SignalInner{ next_id: AtomicU64::new(0), listeners: Mutex::new(Vec::default()) }) }
    }

    /// Adds a listener.
    pub fn connect(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SignalConnection
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        match self.inner.listeners.lock()
        {
            Ok(mut listeners) => listeners.push((id, Arc::new(listener))),
            Err(_) => tracing::error!("signal listeners mutex is broken"),
        }

        let weak: Weak<SignalInner<T>> = Arc::downgrade(&self.inner);
        SignalConnection{ id, signal: weak }
    }

    /// Number of connected listeners.
    pub fn listener_count(&self) -> usize
    {
        self.inner.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Blocks until the next emitted value, or returns `None` after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T>
    where
        T: Clone,
    {
        let (sender, receiver) = bounded(1);
        let connection = self.connect(move |value: &T| { let _ = sender.try_send(value.clone()); });
        let result = receiver.recv_timeout(timeout).ok();
        connection.disconnect();
        result
    }

    /// Calls every listener with `value`.
    pub(crate) fn emit(&self, value: &T)
    {
        let listeners: Vec<Listener<T>> = match self.inner.listeners.lock()
        {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => { tracing::error!("signal listeners mutex is broken"); return; }
        };

        for listener in listeners
        {
            (listener)(value);
        }
    }

    pub(crate) fn disconnect_all(&self)
    {
        match self.inner.listeners.lock()
        {
            Ok(mut listeners) => listeners.clear(),
            Err(_) => tracing::error!("signal listeners mutex is broken"),
        }
    }
}

impl<T> Clone for Signal<T>
{
    fn clone(&self) -> Self
    {
        Self{ inner: self.inner.clone() }
    }
}

impl<T: Send + Sync + 'static> Default for Signal<T>
{
    fn default() -> Self { Self::new() }
}

impl<T> std::fmt::Debug for Signal<T>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Signal").finish_non_exhaustive()
    }
}

//-------------------------------------------------------------------------------------------------------------------
