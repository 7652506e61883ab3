/// Bounded, timestamped log shown in the on-page debug panel
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type Clock = Rc<dyn Fn() -> String>;
pub type Listener = Rc<dyn Fn()>;

struct Inner {
    lines: RefCell<VecDeque<String>>,
    capacity: usize,
    clock: Clock,
    listener: RefCell<Option<Listener>>,
}

/// Cheap to clone; clones share the same buffer
#[derive(Clone)]
pub struct DebugLog {
    inner: Rc<Inner>,
}

impl DebugLog {
    pub fn new(capacity: usize, clock: Clock) -> Self {
        DebugLog {
            inner: Rc::new(Inner {
                lines: RefCell::new(VecDeque::new()),
                capacity: capacity.max(1),
                clock,
                listener: RefCell::new(None),
            }),
        }
    }

    /// Log stamped with the browser's `Date#toISOString`
    pub fn with_browser_clock(capacity: usize) -> Self {
        Self::new(
            capacity,
            Rc::new(|| String::from(js_sys::Date::new_0().to_iso_string())),
        )
    }

    /// Append `[timestamp] message`, evicting the oldest line when full
    pub fn log(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        let line = format!("[{}] {}", (self.inner.clock)(), message);

        {
            let mut lines = self.inner.lines.borrow_mut();
            while lines.len() >= self.inner.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }

        log::info!("{}", message);
        self.notify();
    }

    /// Called after every appended line; replaces any previous listener
    pub fn subscribe(&self, listener: Listener) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    pub fn unsubscribe(&self) {
        self.inner.listener.borrow_mut().take();
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner.lines.borrow().iter().cloned().collect()
    }

    /// Panel text, one line per entry with a trailing newline
    pub fn text(&self) -> String {
        self.inner
            .lines
            .borrow()
            .iter()
            .fold(String::new(), |mut text, line| {
                text.push_str(line);
                text.push('\n');
                text
            })
    }

    pub fn len(&self) -> usize {
        self.inner.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
pub(crate) fn fixed_clock() -> Clock {
    Rc::new(|| "2024-10-28T10:30:00.000Z".to_string())
}
