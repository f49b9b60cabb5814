use std::future::Future;

use flume::{Receiver, Sender};

use crate::error::Result;

/// Spawns background work and carries its results back to the UI thread.
///
/// Tasks spawned here never touch UI state directly. They send a message `M` through the
/// runtime channel, and the owner drains the channel once per frame.
#[derive(Debug)]
pub struct StateRuntime<M> {
    send: Sender<M>,
    recv: Receiver<M>,

    #[cfg(not(target_arch = "wasm32"))]
    handle: tokio::runtime::Handle,
}

impl<M> StateRuntime<M>
where
    M: Send + 'static,
{
    /// Binds to the async runtime of the calling context.
    ///
    /// On native this requires an entered Tokio runtime. On wasm tasks run on the JS event loop.
    pub fn current() -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let handle = tokio::runtime::Handle::try_current().map_err(|err| {
                crate::Error::runtime_unavailable(format!("StateRuntime::current: {err}"))
            })?;
            Ok(Self::with_handle(handle))
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (send, recv) = flume::unbounded();
            Ok(Self { send, recv })
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv, handle }
    }

    pub fn sender(&self) -> Sender<M> {
        self.send.clone()
    }

    /// Takes every message that has arrived so far without blocking.
    pub fn drain(&self) -> impl Iterator<Item = M> + '_ {
        self.recv.try_iter()
    }

    /// Waits for the next message.
    pub async fn recv(&self) -> Option<M> {
        self.recv.recv_async().await.ok()
    }

    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        #[cfg(not(target_arch = "wasm32"))]
        self.handle.spawn(future);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(future);
    }
}
