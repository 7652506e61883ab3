/// UI module exports
use std::rc::Rc;

use crate::runtime::Runtime;

pub mod components;
pub mod debug_panel;
pub mod manage;
pub mod overlay;
pub mod tray;

/// Shared runtime handle; props compare by identity
#[derive(Clone)]
pub struct RuntimeRef(pub Rc<Runtime>);

impl PartialEq for RuntimeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
