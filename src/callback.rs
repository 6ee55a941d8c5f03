use crate::prelude::*;

/// A slot holding at most one handler closure.
///
/// Binding a handler replaces whatever was bound before, and unbinding empties the slot.
/// Invoking an empty slot does nothing and reports that no handler ran.
///
/// ```rust
/// use midly_wire::Callback;
///
/// let mut total = 0;
/// {
///     let mut slot = Callback::<u32>::new();
///     assert!(!slot.invoke(&1));
///     slot.bind(|x| total += *x);
///     assert!(slot.invoke(&2));
///     assert!(slot.invoke(&3));
/// }
/// assert_eq!(total, 5);
/// ```
pub struct Callback<'a, T: ?Sized> {
    handler: Option<Box<dyn FnMut(&T) + 'a>>,
}
impl<'a, T: ?Sized> Callback<'a, T> {
    /// Create an empty slot.
    #[inline]
    pub fn new() -> Callback<'a, T> {
        Callback { handler: None }
    }

    /// Bind a handler, replacing the previous one if any.
    #[inline]
    pub fn bind<F>(&mut self, handler: F)
    where
        F: FnMut(&T) + 'a,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Empty the slot, dropping the handler.
    #[inline]
    pub fn unbind(&mut self) {
        self.handler = None;
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }

    /// Call the bound handler with `arg`.
    ///
    /// Returns `false` if the slot is empty.
    #[inline]
    pub fn invoke(&mut self, arg: &T) -> bool {
        match &mut self.handler {
            Some(handler) => {
                handler(arg);
                true
            }
            None => false,
        }
    }
}
impl<'a, T: ?Sized> Default for Callback<'a, T> {
    #[inline]
    fn default() -> Callback<'a, T> {
        Callback::new()
    }
}
impl<'a, T: ?Sized> fmt::Debug for Callback<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Callback")
            .field("bound", &self.is_bound())
            .finish()
    }
}
