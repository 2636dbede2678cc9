//! Side table associating printability models with CAD objects.

use std::cell::RefCell;
use std::collections::HashMap;

use print_rules::Model;
use print_types::ObjectId;
use tracing::debug;

/// Models keyed by object identity. Interior mutability lets a shared
/// orchestrator attach and detach through `&self`.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RefCell<HashMap<ObjectId, Model>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `model` with `id`, returning any model it replaces.
    pub fn attach(&self, id: ObjectId, model: Model) -> Option<Model> {
        debug!(object = id.0, entries = model.len(), "attaching model");
        self.models.borrow_mut().insert(id, model)
    }

    pub fn detach(&self, id: ObjectId) -> Option<Model> {
        debug!(object = id.0, "detaching model");
        self.models.borrow_mut().remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<Model> {
        self.models.borrow().get(&id).cloned()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.models.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.models.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_replace_detach() {
        let reg = ModelRegistry::new();
        let id = ObjectId::fresh();
        assert!(reg.attach(id, Model::new().with_scalar("a", 1.0)).is_none());
        let old = reg.attach(id, Model::new().with_scalar("a", 2.0)).unwrap();
        assert!(old.contains("a"));
        assert_eq!(reg.len(), 1);
        assert!(reg.detach(id).is_some());
        assert!(!reg.contains(id));
        assert!(reg.detach(id).is_none());
    }
}
