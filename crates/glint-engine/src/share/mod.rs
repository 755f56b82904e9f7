//! GPU content shared between windows of one share group.
//!
//! `ShareContent` is a cheap handle: cloning it adds an owner, dropping it
//! releases one. The effect registry (and every effect nobody else holds) is
//! released together with the last owner.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::device::Device;
use crate::shader::{Effect, EffectHandle};

struct Inner {
    device: Device,
    effects: RefCell<BTreeMap<String, EffectHandle>>,
}

/// Named effect registry shared by windows using one GL share group.
#[derive(Clone)]
pub struct ShareContent {
    inner: Rc<Inner>,
}

impl ShareContent {
    pub fn new(device: Device) -> Self {
        Self {
            inner: Rc::new(Inner {
                device,
                effects: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// Returns the effect registered under `name`, creating an empty one on
    /// first use.
    ///
    /// Absent names are not an error: the registry is get-or-create, and the
    /// same name yields the same handle until it is removed.
    pub fn effect(&self, name: &str) -> EffectHandle {
        let mut effects = self.inner.effects.borrow_mut();
        if let Some(effect) = effects.get(name) {
            return Rc::clone(effect);
        }

        log::debug!("registering effect `{name}`");
        let effect = Rc::new(RefCell::new(Effect::new(Rc::clone(&self.inner.device))));
        effects.insert(name.to_string(), Rc::clone(&effect));
        effect
    }

    /// Unregisters `name`. Returns `false` when it was not registered.
    ///
    /// Handles obtained earlier stay valid; the GL program is released when
    /// the last of them is dropped.
    pub fn remove_effect(&self, name: &str) -> bool {
        self.inner.effects.borrow_mut().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.effects.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.effects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.effects.borrow().is_empty()
    }

    /// Registered effect names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.inner.effects.borrow().keys().cloned().collect()
    }

    /// Device effects are created on.
    pub fn device(&self) -> Device {
        Rc::clone(&self.inner.device)
    }

    /// Number of live handles (windows, debug helpers, clones) to this content.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    pub fn ptr_eq(&self, other: &ShareContent) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
