//! Generic background-thread pipeline host.
//!
//! A `Translator<P>` owns a worker thread that drains an input queue through
//! `P::process` and republishes whatever it returns onto an output queue.
//! Built on the same `Tx`/`Rx` split `signal_flow` uses elsewhere in this
//! workspace, so both the decoding direction and the (trivial) encoding
//! direction share one host implementation, matching the two Processor impls
//! defined in [`crate::decoder`] and [`crate::encoder`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_flow::{pair, Rx, Tx};

use crate::error::{MorseError, Result};

/// A stateful, single-threaded step function driven by [`Translator`].
pub trait Processor: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Consume one input item, returning zero or more output items. An `Err`
    /// return terminates the worker: any internal invariant violation (e.g.
    /// a window evicting past its classified offset) is unrecoverable, and
    /// the host surfaces it as a closed pipeline rather than retrying.
    fn process(&mut self, item: Self::Input) -> Result<Vec<Self::Output>>;
}

enum Message<T> {
    Item(T),
    /// Round-trips through the worker so `wait()` can block until every
    /// item queued before it has been processed.
    Barrier,
    Close,
}

/// Generic handle to a running background worker.
///
/// `put`/`get` give FIFO, blocking access to the input/output queues;
/// `try_get` is the non-blocking variant. `close` is idempotent-but-erroring:
/// the first call drains the worker and joins its thread, any further call
/// (or any `put`/`get` after it) fails with [`MorseError::already_closed`].
pub struct Translator<P: Processor> {
    input: signal_flow::SenderTx<Message<P::Input>>,
    output: signal_flow::ReceiverRx<P::Output>,
    ack_rx: std::sync::mpsc::Receiver<()>,
    closed: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<P: Processor> Translator<P> {
    pub fn spawn(processor: P) -> Self {
        let (input_tx, input_rx) = pair::<Message<P::Input>>();
        let (output_tx, output_rx) = pair::<P::Output>();
        let (ack_tx, ack_rx) = std::sync::mpsc::channel();
        let closed = Arc::new(AtomicBool::new(false));
        let worker_closed = closed.clone();

        let worker = thread::spawn(move || run(processor, input_rx, output_tx, ack_tx, worker_closed));

        Translator {
            input: input_tx,
            output: output_rx,
            ack_rx,
            closed,
            worker: Some(worker),
        }
    }

    pub fn put(&mut self, item: P::Input) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MorseError::already_closed());
        }
        self.input.send(Message::Item(item)).map_err(|_| {
            self.closed.store(true, Ordering::SeqCst);
            MorseError::translator("input queue closed")
        })
    }

    /// Block until the next output item is available.
    pub fn get(&mut self) -> Result<P::Output> {
        match self.output.recv() {
            Ok(Some(item)) => Ok(item),
            Ok(None) => Err(MorseError::already_closed()),
            Err(_) => Err(MorseError::translator("output queue error")),
        }
    }

    /// Non-blocking poll: `Err(empty)` if nothing is ready yet.
    pub fn try_get(&mut self) -> Result<P::Output> {
        match self.output.try_recv() {
            Ok(item) => Ok(item),
            Err(TryRecvError::Empty) => Err(MorseError::empty()),
            Err(TryRecvError::Disconnected) => Err(MorseError::already_closed()),
        }
    }

    /// Block until every item `put` before this call has been processed.
    /// If the worker exits (cleanly or on an internal error) while a
    /// barrier is outstanding, that also satisfies the wait: there's
    /// nothing left to drain either way.
    pub fn wait(&mut self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Ok(());
        }
        if self.input.send(Message::Barrier).is_err() {
            return Ok(());
        }
        let _ = self.ack_rx.recv();
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        let already_closed = self.closed.swap(true, Ordering::SeqCst);
        if !already_closed {
            let _ = self.input.send(Message::Close);
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        if already_closed {
            Err(MorseError::already_closed())
        } else {
            tracing::info!("translator closed");
            Ok(())
        }
    }

    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl<P: Processor> Drop for Translator<P> {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::SeqCst) {
            let _ = self.close();
        } else if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn run<P: Processor>(
    mut processor: P,
    mut input: signal_flow::ReceiverRx<Message<P::Input>>,
    mut output: signal_flow::SenderTx<P::Output>,
    ack_tx: std::sync::mpsc::Sender<()>,
    closed: Arc<AtomicBool>,
) {
    loop {
        match input.recv() {
            Ok(Some(Message::Item(item))) => match processor.process(item) {
                Ok(items) => {
                    for item in items {
                        if output.send(item).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "worker terminating after internal error");
                    closed.store(true, Ordering::SeqCst);
                    break;
                }
            },
            Ok(Some(Message::Barrier)) => {
                let _ = ack_tx.send(());
            }
            Ok(Some(Message::Close)) | Ok(None) => {
                closed.store(true, Ordering::SeqCst);
                break;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Double;

    impl Processor for Double {
        type Input = i32;
        type Output = i32;

        fn process(&mut self, item: i32) -> Result<Vec<i32>> {
            Ok(vec![item * 2])
        }
    }

    struct Poison;

    impl Processor for Poison {
        type Input = i32;
        type Output = i32;

        fn process(&mut self, item: i32) -> Result<Vec<i32>> {
            if item == 13 {
                Err(MorseError::process("unlucky"))
            } else {
                Ok(vec![item])
            }
        }
    }

    #[test]
    fn round_trips_items_in_fifo_order() {
        let mut t = Translator::spawn(Double);
        t.put(1).unwrap();
        t.put(2).unwrap();
        t.put(3).unwrap();
        assert_eq!(t.get().unwrap(), 2);
        assert_eq!(t.get().unwrap(), 4);
        assert_eq!(t.get().unwrap(), 6);
    }

    #[test]
    fn wait_blocks_until_queued_items_are_processed() {
        let mut t = Translator::spawn(Double);
        t.put(5).unwrap();
        t.wait().unwrap();
        assert_eq!(t.try_get().unwrap(), 10);
    }

    #[test]
    fn double_close_errors() {
        let mut t = Translator::spawn(Double);
        t.close().unwrap();
        let err = t.close().unwrap_err();
        assert_eq!(err.code(), MorseError::CODE_TRANSLATOR);
    }

    #[test]
    fn put_after_close_errors() {
        let mut t = Translator::spawn(Double);
        t.close().unwrap();
        let err = t.put(1).unwrap_err();
        assert_eq!(err.code(), MorseError::CODE_TRANSLATOR);
    }

    #[test]
    fn internal_error_closes_the_pipeline() {
        let mut t = Translator::spawn(Poison);
        t.put(13).unwrap();
        t.wait().unwrap();
        assert!(t.closed());
    }

    #[test]
    fn try_get_reports_empty_without_blocking() {
        let mut t = Translator::spawn(Double);
        let err = t.try_get().unwrap_err();
        assert_eq!(err.code(), MorseError::CODE_TRANSLATOR);
    }
}
