//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

//-------------------------------------------------------------------------------------------------------------------

#[derive(Default)]
struct MockEndState
{
    handler: Option<ReceiveHandler>,
    /// Set while a newly installed handler works through the backlog; new events queue behind it.
    draining: bool,
    /// Events that arrived before a handler was installed.
    backlog: VecDeque<ChannelEvent>,
}

#[derive(Default)]
struct MockEnd
{
    state: Mutex<MockEndState>,
}

impl MockEnd
{
    fn deliver(&self, event: ChannelEvent)
    {
        let handler = {
            let Ok(mut state) = self.state.lock()
            else { tracing::error!("mock channel mutex is broken"); return; };

            match state.handler.clone()
            {
                Some(handler) if !state.draining => handler,
                _ => { state.backlog.push_back(event); return; }
            }
        };

        (handler)(event);
    }

    fn install(&self, handler: ReceiveHandler)
    {
        match self.state.lock()
        {
            Ok(mut state) =>
            {
                state.handler = Some(handler.clone());
                state.draining = true;
            }
            Err(_) => { tracing::error!("mock channel mutex is broken"); return; }
        }

        loop
        {
            let backlog = {
                let Ok(mut state) = self.state.lock()
                else { tracing::error!("mock channel mutex is broken"); return; };

                if state.backlog.is_empty() { state.draining = false; return; }
                std::mem::take(&mut state.backlog)
            };

            for event in backlog
            {
                (handler)(event);
            }
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// In-process channel end that delivers synchronously.
///
/// [`Channel::send`] runs the other end's receive handler on the calling thread before returning, so a
/// fire is observable as soon as the call completes.
pub struct MockChannel
{
    label: &'static str,
    open: Arc<AtomicBool>,
    local: Arc<MockEnd>,
    peer: Arc<MockEnd>,
}

impl MockChannel
{
    /// Makes two connected ends.
    pub fn pair() -> ChannelPair
    {
        let (server, client) = Self::ends();
        ChannelPair{ server: Arc::new(server), client: Arc::new(client) }
    }

    /// Makes two connected ends as concrete types.
    pub fn ends() -> (MockChannel, MockChannel)
    {
        let open = Arc::new(AtomicBool::new(true));
        let server_end = Arc::new(MockEnd::default());
        let client_end = Arc::new(MockEnd::default());

        (
            MockChannel{ label: "server", open: open.clone(), local: server_end.clone(), peer: client_end.clone() },
            MockChannel{ label: "client", open, local: client_end, peer: server_end },
        )
    }
}

impl Channel for MockChannel
{
    fn send(&self, frame: Vec<u8>) -> Result<(), ChannelError>
    {
        if !self.open.load(Ordering::Acquire) { return Err(ChannelError::Closed); }

        tracing::trace!(from = self.label, len = frame.len(), "mock channel frame");
        self.peer.deliver(ChannelEvent::Frame(frame));
        Ok(())
    }

    fn on_receive(&self, handler: ReceiveHandler)
    {
        self.local.install(handler);
    }

    fn close(&self)
    {
        if !self.open.swap(false, Ordering::AcqRel) { return; }

        tracing::trace!(by = self.label, "mock channel closed");
        self.local.deliver(ChannelEvent::Closed);
        self.peer.deliver(ChannelEvent::Closed);
    }

    fn is_open(&self) -> bool
    {
        self.open.load(Ordering::Acquire)
    }
}

//-------------------------------------------------------------------------------------------------------------------
