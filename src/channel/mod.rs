//module tree
mod transport;
mod mock_channel;
#[cfg(feature = "queued")]
mod queued_channel;

//API exports
pub use crate::channel::transport::*;
pub use crate::channel::mock_channel::*;
#[cfg(feature = "queued")]
#[cfg_attr(docsrs, doc(cfg(feature = "queued")))]
pub use crate::channel::queued_channel::*;
