use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use sw_core::{NewExpense, RecordId};
use sw_store::DocumentStore;

/// One store write off the UI thread.
pub struct WriteWorker {
    result_rx: Receiver<WriteMessage>,
    _handle: JoinHandle<()>,
}

#[derive(Debug, Clone)]
pub enum WriteMessage {
    Done { id: RecordId },
    Failed { message: String },
}

impl WriteWorker {
    pub fn start(store: Arc<dyn DocumentStore>, collection: &str, expense: NewExpense) -> Self {
        let (tx, rx) = channel();
        let collection = collection.to_string();

        let handle = thread::spawn(move || {
            Self::write(store.as_ref(), &collection, expense, &tx);
        });

        Self {
            result_rx: rx,
            _handle: handle,
        }
    }

    /// The write's outcome once it is known. A worker that exits without
    /// reporting, e.g. after a panic, reads as `Failed`.
    pub fn poll(&self) -> Option<WriteMessage> {
        match self.result_rx.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("write worker exited without reporting");
                Some(WriteMessage::Failed {
                    message: "Write worker stopped unexpectedly".to_string(),
                })
            }
        }
    }

    fn write(
        store: &dyn DocumentStore,
        collection: &str,
        expense: NewExpense,
        tx: &Sender<WriteMessage>,
    ) {
        let msg = match store.add(collection, expense) {
            Ok(id) => {
                tracing::info!(%id, collection, "expense written");
                WriteMessage::Done { id }
            }
            Err(e) => {
                tracing::warn!(collection, "write failed: {e}");
                WriteMessage::Failed {
                    message: format!("Write failed: {e}"),
                }
            }
        };
        // The app may have gone away; nothing to report to.
        let _ = tx.send(msg);
    }
}
