//! Bounded intent queue with kill-switch priority

use heapless::Deque;

use super::events::Intent;
use crate::error::EngineError;

/// Intents buffered between the inbound channel and the controller
pub const INTENT_QUEUE_DEPTH: usize = 16;

/// FIFO of pending intents
///
/// A kill intent jumps to the front. When the queue is full, ordinary
/// intents are refused and a kill evicts the newest pending intent.
#[derive(Debug, Default)]
pub struct IntentQueue {
    pending: Deque<Intent, INTENT_QUEUE_DEPTH>,
}

impl IntentQueue {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Enqueue an intent
    pub fn push(&mut self, intent: Intent) -> Result<(), EngineError> {
        if intent.is_kill() {
            if self.pending.is_full() {
                self.pending.pop_back();
            }
            self.pending
                .push_front(intent)
                .map_err(|_| EngineError::QueueFull)
        } else {
            self.pending
                .push_back(intent)
                .map_err(|_| EngineError::QueueFull)
        }
    }

    /// Next intent to process
    pub fn pop(&mut self) -> Option<Intent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
