//! By-reference rule arguments
//!
//! Some grammars pass state into rules that the rule may update in place
//! (nesting counters, "inside a table" flags and the like). Rules receive a
//! [`Ref`], a shared mutable cell. Backtracking does not undo writes: a call
//! site that tries an alternative after a failed one must put the old value
//! back itself, typically via [`Ref::snapshot`] and [`Ref::restore`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared mutable cell handed to rules as a by-reference argument
pub struct Ref<T>(Rc<RefCell<T>>);

impl<T> Ref<T> {
    /// Wrap a value
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Overwrite the value
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Overwrite the value and return the old one
    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    /// Mutate in place
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Read through a borrow
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Put back a value saved before an alternative was tried
    pub fn restore(&self, saved: T) {
        self.set(saved);
    }
}

impl<T: Clone> Ref<T> {
    /// Copy of the current value
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }

    /// Copy of the current value, to hand back to [`Ref::restore`]
    pub fn snapshot(&self) -> T {
        self.get()
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.0.borrow()).finish()
    }
}

impl<T: Default> Default for Ref<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bump(depth: &Ref<u32>) {
        depth.update(|d| *d += 1);
    }

    #[test]
    fn test_writes_are_visible_to_caller() {
        let depth = Ref::new(0u32);
        bump(&depth);
        bump(&depth.clone());
        assert_eq!(depth.get(), 2);
    }

    #[test]
    fn test_restore_after_failed_alternative() {
        let depth = Ref::new(5u32);
        let saved = depth.snapshot();
        bump(&depth);
        assert_eq!(depth.get(), 6);
        depth.restore(saved);
        assert_eq!(depth.get(), 5);
    }

    #[test]
    fn test_replace_and_with() {
        let name = Ref::new(String::from("a"));
        assert_eq!(name.replace("b".into()), "a");
        assert_eq!(name.with(|s| s.len()), 1);
    }
}
