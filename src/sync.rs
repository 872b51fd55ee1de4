//! Sharing the kernel with hook callbacks on the host's single game thread.

use core::{
    cell::{RefCell, RefMut},
    ops::{Deref, DerefMut},
};

/// A mutual exclusion primitive for state shared between hook callbacks.
///
/// The host drives every hook and every frame update from one logical game
/// thread, so this mutex never needs to block: it is a [`RefCell`] with a
/// mutex shaped API, which lets a `static GLOBAL: Mutex<Kernel>` be shared
/// between hooks the same way a real mutex would be. Re-entrant locking
/// (a hook firing inside another hook's critical section) panics instead of
/// deadlocking; [`try_lock`](Self::try_lock) is the non-panicking form for
/// call sites where the host is known to re-enter.
pub struct Mutex<T: ?Sized>(RefCell<T>);

/// An RAII guard returned by [`Mutex::lock`]. The lock is released when the
/// guard is dropped.
pub struct MutexGuard<'a, T: ?Sized>(RefMut<'a, T>);

impl<T> Mutex<T> {
    /// Creates a new mutex in an unlocked state ready for use.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(RefCell::new(value))
    }

    /// Consumes this mutex, returning the underlying data.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Acquires the mutex, panicking if it is already locked.
    #[track_caller]
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        MutexGuard(self.0.borrow_mut())
    }

    /// Attempts to acquire the mutex, returning `None` if it is already
    /// locked. This function does not block.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.0.try_borrow_mut().ok().map(MutexGuard)
    }

    /// Returns a mutable reference to the underlying data.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.0.get_mut()
    }
}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: This is the same as std's Mutex, but it can only be safe because
// the host calls into the overlay from a single logical game thread. Using
// this type from any other thread is outside the crate's contract.
unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}

// SAFETY: See the Send impl above.
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}
