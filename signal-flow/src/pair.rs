//! Tx to Rx adapter built on top of `std::mpsc`.
use crate::tx::*;
use crate::rx::*;

use std::sync::mpsc::{channel, Sender, Receiver, TryRecvError};
use std::error::Error;

pub struct SenderTx<T> {
    sender: Sender<T>,
}

/// Never returns an error. If corresponding sender hung up,
/// any further call to `recv()` returns `Ok(None)`.
pub struct ReceiverRx<T> {
    receiver: Receiver<T>,
}

impl<T> ReceiverRx<T> {
    /// Non-blocking poll. Distinguishes "nothing queued yet" from "the sender
    /// hung up", unlike `recv()` which folds both successful-drain and
    /// disconnect into its blocking wait.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.try_recv()
    }
}

pub fn pair<T>() -> (SenderTx<T>, ReceiverRx<T>) {
    let (sender, receiver) = channel();

    (SenderTx { sender }, ReceiverRx { receiver })
}

impl<T: Send + 'static> Tx for SenderTx<T> {
    type Item = T;

    fn send(&mut self, value: Self::Item) -> Result<(), Box<dyn Error>> {
        self.sender.send(value).map_err(|e| e.into())
    }
}

impl<T> Rx for ReceiverRx<T> {
    type Item = T;

    fn recv(&mut self) -> Result<Option<Self::Item>, Box<dyn Error>> {
        match self.receiver.recv() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Ok(None)
        }
    }
}
