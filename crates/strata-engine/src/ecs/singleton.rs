// ecs/singleton.rs
//
// Singleton components, one value per type, borrowed through `RefCell`.

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

/// Storage for singleton components: at most one value per type.
///
/// Each value sits in its own `RefCell`, so a system can hold the camera
/// context immutably while mutating the draw list. Borrowing the same type
/// mutably twice at once panics, exactly like `RefCell`.
#[derive(Default)]
pub struct Singletons {
    values: HashMap<TypeId, RefCell<Box<dyn Any>>>,
}

impl Singletons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the singleton of type `T`. Returns the previous value.
    pub fn set<T: 'static>(&mut self, value: T) -> Option<T> {
        let previous = self
            .values
            .insert(TypeId::of::<T>(), RefCell::new(Box::new(value)));
        previous.and_then(|cell| cell.into_inner().downcast::<T>().ok().map(|b| *b))
    }

    pub fn has<T: 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T: 'static>(&self) -> Option<Ref<'_, T>> {
        let cell = self.values.get(&TypeId::of::<T>())?;
        Ref::filter_map(cell.borrow(), |value| value.downcast_ref::<T>()).ok()
    }

    pub fn get_mut<T: 'static>(&self) -> Option<RefMut<'_, T>> {
        let cell = self.values.get(&TypeId::of::<T>())?;
        RefMut::filter_map(cell.borrow_mut(), |value| value.downcast_mut::<T>()).ok()
    }

    /// Remove the singleton of type `T`, handing it back to the caller.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let cell = self.values.remove(&TypeId::of::<T>())?;
        cell.into_inner().downcast::<T>().ok().map(|b| *b)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Score(u32);

    #[derive(Debug, PartialEq)]
    struct Label(&'static str);

    #[test]
    fn set_get_replace() {
        let mut s = Singletons::new();
        assert!(s.set(Score(1)).is_none());
        assert_eq!(*s.get::<Score>().unwrap(), Score(1));
        assert_eq!(s.set(Score(7)), Some(Score(1)));
        assert_eq!(s.get::<Score>().unwrap().0, 7);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn missing_singleton_is_none() {
        let s = Singletons::new();
        assert!(!s.has::<Score>());
        assert!(s.get::<Score>().is_none());
        assert!(s.get_mut::<Score>().is_none());
    }

    #[test]
    fn different_types_borrow_together() {
        let mut s = Singletons::new();
        s.set(Score(0));
        s.set(Label("hud"));
        let label = s.get::<Label>().unwrap();
        let mut score = s.get_mut::<Score>().unwrap();
        score.0 += label.0.len() as u32;
        drop(score);
        assert_eq!(s.get::<Score>().unwrap().0, 3);
    }

    #[test]
    fn remove_returns_value() {
        let mut s = Singletons::new();
        s.set(Score(5));
        assert_eq!(s.remove::<Score>(), Some(Score(5)));
        assert!(!s.has::<Score>());
        assert!(s.is_empty());
    }

    #[test]
    #[should_panic]
    fn same_type_borrowed_mutably_twice_panics() {
        let mut s = Singletons::new();
        s.set(Score(0));
        let _first = s.get_mut::<Score>();
        let _second = s.get_mut::<Score>();
    }
}
