// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

type Task = Box<dyn FnOnce()>;

/// A single‑threaded queue of work deferred to the next run loop turn.
///
/// The host calls [`RunLoop::turn`] once per iteration of its UI loop. Work
/// deferred while a turn is running is not picked up by that turn; it waits
/// for the next one. This is what lets a native callback schedule an update
/// without re-entering the view that is still inside the callback.
///
/// Cloning a `RunLoop` yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct RunLoop {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl RunLoop {
    /// Creates an empty run loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` for the next turn.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Number of tasks waiting for a turn.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs the tasks that were queued when this turn started.
    ///
    /// Returns the number of tasks run.
    pub fn turn(&self) -> usize {
        let batch = core::mem::take(&mut *self.queue.borrow_mut());
        let ran = batch.len();
        for task in batch {
            task();
        }
        ran
    }
}

impl fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLoop")
            .field("pending", &self.pending())
            .finish()
    }
}
