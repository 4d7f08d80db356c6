use std::sync::Arc;

/// Single-slot cache: keeps the last value and the dependencies it was
/// computed from, recomputing only when the dependencies change.
#[derive(Debug)]
pub struct Memo<D, V> {
    slot: Option<(D, Arc<V>)>,
}

impl<D: PartialEq, V> Memo<D, V> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn get_or_compute(&mut self, deps: D, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some((cached, value)) = &self.slot {
            if *cached == deps {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(compute());
        self.slot = Some((deps, Arc::clone(&value)));
        value
    }
}

impl<D: PartialEq, V> Default for Memo<D, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares the pointee address of an `Arc`, not its contents
#[derive(Debug)]
pub struct ByIdentity<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> PartialEq for ByIdentity<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl<T: ?Sized> Clone for ByIdentity<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
