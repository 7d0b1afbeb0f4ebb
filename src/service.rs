use std::time;

use tokio::sync::mpsc;
use tracing::debug;

use crate::Processor;

/// Channel-fed boundary around a [`Processor`].
///
/// A spawned task drains submitted payloads one at a time and forwards
/// exactly one serialized response per payload, in submission order. The
/// collaborator feeding the channel stays responsible for delimiting
/// payloads and writing responses out.
#[derive(Debug)]
pub struct Service {
    payloads: mpsc::Sender<Vec<u8>>,
}

impl Service {
    pub fn spawn(capacity: usize, processor: Processor) -> (Self, mpsc::Receiver<String>) {
        let (payloads_tx, mut payloads) = mpsc::channel::<Vec<u8>>(capacity);
        let (responses_tx, responses) = mpsc::channel(capacity);

        tokio::spawn(async move {
            while let Some(payload) = payloads.recv().await {
                let response = processor.handle_raw(&payload);

                if responses_tx.send(response).await.is_err() {
                    debug!("response receiver dropped, stopping service");
                    break;
                }
            }
        });

        (
            Self {
                payloads: payloads_tx,
            },
            responses,
        )
    }

    /// Submits one raw request payload. Returns `false` when the service
    /// task is gone or the timeout elapsed before the payload was queued.
    pub async fn submit<P>(&self, payload: P, timeout: Option<time::Duration>) -> bool
    where
        P: Into<Vec<u8>>,
    {
        let payload = payload.into();

        match timeout {
            Some(t) => self.payloads.send_timeout(payload, t).await.is_ok(),
            None => self.payloads.send(payload).await.is_ok(),
        }
    }
}
