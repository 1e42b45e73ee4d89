//local shortcuts
use crate::*;

//third-party shortcuts

//standard shortcuts
use std::sync::Arc;

//-------------------------------------------------------------------------------------------------------------------

/// Something a [`Channel`] hands to its receive handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent
{
    /// A frame sent by the other end.
    Frame(Vec<u8>),
    /// The channel closed. Delivered at most once per end.
    Closed,
}

/// Callback installed with [`Channel::on_receive`].
pub type ReceiveHandler = Arc<dyn Fn(ChannelEvent) + Send + Sync + 'static>;

//-------------------------------------------------------------------------------------------------------------------

/// One end of an ordered, bidirectional link between the server and one client.
///
/// Frames are opaque bytes. Implementations must deliver frames in send order and must deliver
/// [`ChannelEvent::Closed`] to both ends when either end closes, after every frame accepted by
/// [`Channel::send`] before the close.
pub trait Channel: Send + Sync + 'static
{
    /// Queues a frame for the other end.
    fn send(&self, frame: Vec<u8>) -> Result<(), ChannelError>;

    /// Installs the handler for frames arriving at this end, replacing any previous handler.
    ///
    /// Frames that arrived before a handler was installed are delivered to the first handler.
    fn on_receive(&self, handler: ReceiveHandler);

    /// Closes both ends. Idempotent.
    fn close(&self);

    fn is_open(&self) -> bool;
}

//-------------------------------------------------------------------------------------------------------------------

/// The two ends of one link.
#[derive(Clone)]
pub struct ChannelPair
{
    pub server: Arc<dyn Channel>,
    pub client: Arc<dyn Channel>,
}

//-------------------------------------------------------------------------------------------------------------------
