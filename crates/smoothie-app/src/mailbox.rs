//! Re-entrant message delivery for single-threaded shells
//!
//! In a browser some surface calls raise events synchronously: blurring the
//! input fires its `blur` listener before `blur()` returns. That listener
//! runs while the engine is still borrowed by the update that called
//! `blur()`. Messages therefore go through a [`Mailbox`]. Whoever holds the
//! engine drains it, and a delivery that finds the engine busy only queues.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::message::Message;

/// Shared FIFO of messages waiting for the engine
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: Rc<RefCell<VecDeque<Message>>>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, msg: Message) {
        self.queue.borrow_mut().push_back(msg);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn pop(&self) -> Option<Message> {
        self.queue.borrow_mut().pop_front()
    }

    /// Run queued messages through `target` until the queue is empty.
    ///
    /// Returns `None` without running anything when `target` is already
    /// borrowed; the holder drains instead. Messages posted by `run` itself
    /// are picked up in the same call.
    pub fn drain<T>(&self, target: &RefCell<T>, mut run: impl FnMut(&mut T, Message)) -> Option<usize> {
        let mut target = target.try_borrow_mut().ok()?;
        let mut count = 0;
        while let Some(msg) = self.pop() {
            run(&mut *target, msg);
            count += 1;
        }
        Some(count)
    }

    /// Post `msg` and drain if `target` is free
    pub fn deliver<T>(
        &self,
        target: &RefCell<T>,
        msg: Message,
        run: impl FnMut(&mut T, Message),
    ) -> Option<usize> {
        self.post(msg);
        self.drain(target, run)
    }
}
