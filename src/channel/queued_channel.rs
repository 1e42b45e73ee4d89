//local shortcuts
use crate::*;

//third-party shortcuts
use crossbeam::channel::{select, unbounded, Receiver, Sender};

//standard shortcuts
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

fn run_receiver(
    label    : &'static str,
    frames   : Receiver<Vec<u8>>,
    shutdown : Receiver<()>,
    handler  : Arc<Mutex<Option<ReceiveHandler>>>,
){
    let current_handler = || -> Option<ReceiveHandler>
    {
        match handler.lock()
        {
            Ok(handler) => handler.clone(),
            Err(_) => { tracing::error!("queued channel handler mutex is broken"); None }
        }
    };

    loop
    {
        select!
        {
            recv(frames) -> frame =>
            {
                let Ok(frame) = frame else { break; };
                let Some(handler) = current_handler() else { continue; };
                (handler)(ChannelEvent::Frame(frame));
            }
            recv(shutdown) -> _ => break,
        }
    }

    // frames accepted before the close still go out ahead of it
    if let Some(handler) = current_handler()
    {
        for frame in frames.try_iter()
        {
            (handler)(ChannelEvent::Frame(frame));
        }
    }

    tracing::trace!(end = label, "queued channel receiver stopped");
    if let Some(handler) = current_handler()
    {
        (handler)(ChannelEvent::Closed);
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// In-process channel end backed by FIFO queues.
///
/// Each end drains its incoming queue on a dedicated thread, started when the first receive handler is
/// installed. Sending never blocks.
///
/// Receive handlers run on that thread: a blocking invocation issued from inside an event listener on
/// the same link would wait for a response that thread can no longer deliver.
pub struct QueuedChannel
{
    label: &'static str,
    open: Arc<AtomicBool>,
    outgoing: Sender<Vec<u8>>,
    /// Taken by the receiver thread when it starts.
    incoming: Mutex<Option<Receiver<Vec<u8>>>>,
    /// Dropping the sender stops both receiver threads.
    shutdown_sender: Arc<Mutex<Option<Sender<()>>>>,
    shutdown: Receiver<()>,
    handler: Arc<Mutex<Option<ReceiveHandler>>>,
}

impl QueuedChannel
{
    /// Makes two connected ends.
    pub fn pair() -> ChannelPair
    {
        let (server, client) = Self::ends();
        ChannelPair{ server: Arc::new(server), client: Arc::new(client) }
    }

    /// Makes two connected ends as concrete types.
    pub fn ends() -> (QueuedChannel, QueuedChannel)
    {
        let open = Arc::new(AtomicBool::new(true));
        let (to_client, from_server) = unbounded();
        let (to_server, from_client) = unbounded();
        let (shutdown_sender, shutdown) = unbounded();
        let shutdown_sender = Arc::new(Mutex::new(Some(shutdown_sender)));

        (
            QueuedChannel{
                label: "server",
                open: open.clone(),
                outgoing: to_client,
                incoming: Mutex::new(Some(from_client)),
                shutdown_sender: shutdown_sender.clone(),
                shutdown: shutdown.clone(),
                handler: Arc::new(Mutex::new(None)),
            },
            QueuedChannel{
                label: "client",
                open,
                outgoing: to_server,
                incoming: Mutex::new(Some(from_server)),
                shutdown_sender,
                shutdown,
                handler: Arc::new(Mutex::new(None)),
            },
        )
    }

    fn start_receiver(&self)
    {
        let incoming = match self.incoming.lock()
        {
            Ok(mut incoming) => incoming.take(),
            Err(_) => { tracing::error!("queued channel receiver mutex is broken"); return; }
        };
        let Some(incoming) = incoming else { return; };

        let label = self.label;
        let shutdown = self.shutdown.clone();
        let handler = self.handler.clone();

        if let Err(err) = std::thread::Builder::new()
            .name(format!("simplenet-remotes-{}", label))
            .spawn(move || run_receiver(label, incoming, shutdown, handler))
        {
            tracing::error!(?err, end = label, "failed spawning queued channel receiver");
        }
    }
}

impl Channel for QueuedChannel
{
    fn send(&self, frame: Vec<u8>) -> Result<(), ChannelError>
    {
        if !self.open.load(Ordering::Acquire) { return Err(ChannelError::Closed); }

        tracing::trace!(from = self.label, len = frame.len(), "queued channel frame");
        self.outgoing.send(frame).map_err(|_| ChannelError::Closed)
    }

    fn on_receive(&self, handler: ReceiveHandler)
    {
        match self.handler.lock()
        {
            Ok(mut current) => *current = Some(handler),
            Err(_) => { tracing::error!("queued channel handler mutex is broken"); return; }
        }

        self.start_receiver();
    }

    fn close(&self)
    {
        if !self.open.swap(false, Ordering::AcqRel) { return; }

        tracing::trace!(by = self.label, "queued channel closed");
        match self.shutdown_sender.lock()
        {
            Ok(mut sender) => { let _ = sender.take(); }
            Err(_) => tracing::error!("queued channel shutdown mutex is broken"),
        }
    }

    fn is_open(&self) -> bool
    {
        self.open.load(Ordering::Acquire)
    }
}

//-------------------------------------------------------------------------------------------------------------------
