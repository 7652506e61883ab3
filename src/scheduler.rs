/// Deferred callbacks with id-based cancellation
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Run `task` once after `delay_ms` milliseconds
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskId;

    /// Drop a task that has not run yet. Returns false when it already ran
    /// or was cancelled before.
    fn cancel(&self, id: TaskId) -> bool;
}

/// `setTimeout`-backed scheduler for the browser
#[derive(Default)]
pub struct TimeoutScheduler {
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<TaskId, Timeout>>>,
    // Fired timeouts are parked here so they are not dropped from inside
    // their own callback.
    spent: Rc<RefCell<Vec<Timeout>>>,
}

impl TimeoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskId {
        self.spent.borrow_mut().clear();

        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let pending = Rc::clone(&self.pending);
        let spent = Rc::clone(&self.spent);
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(fired) = pending.borrow_mut().remove(&id) {
                spent.borrow_mut().push(fired);
            }
            task();
        });

        self.pending.borrow_mut().insert(id, timeout);
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        // Dropping a gloo Timeout clears it
        self.pending.borrow_mut().remove(&id).is_some()
    }
}

/// Virtual-time scheduler driven by `advance`
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<(u64, TaskId, Task)>>,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward, running due tasks in deadline order
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, (at, _, _))| *at <= target)
                    .min_by_key(|(_, (at, id, _))| (*at, *id))
                    .map(|(i, _)| i);
                due.map(|i| queue.remove(i))
            };

            match next {
                Some((at, _, task)) => {
                    self.now.set(at);
                    task();
                }
                None => break,
            }
        }
        self.now.set(target);
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.queue
            .borrow_mut()
            .push((self.now.get() + u64::from(delay_ms), id, task));
        id
    }

    fn cancel(&self, id: TaskId) -> bool {
        let mut queue = self.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(_, queued, _)| *queued != id);
        queue.len() < before
    }
}
