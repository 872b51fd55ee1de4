//! The boundary between the kernel and the host-specific layer.
//!
//! The kernel never touches the game directly. The hooking layer implements
//! [`HostQuery`] on top of whatever it uses to reach the game's object graph
//! and [`Narrator`] on top of its text-to-speech queue; the kernel only ever
//! calls through these traits.

use core::fmt;

/// An error returned by a host query.
#[derive(Debug)]
#[non_exhaustive]
pub struct Error {}

/// An opaque handle to a UI object owned by the host.
///
/// The kernel records the handle a screen presented at activation time and
/// later hands it back to [`HostQuery::is_element_visible`] to confirm the
/// screen still exists. The kernel never dereferences it.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Element(u64);

impl Element {
    /// The null handle.
    pub const NULL: Self = Self(0);

    /// Creates a new handle from the given raw value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying raw value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Checks whether the handle is null.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Element {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self, f)
    }
}

impl fmt::Display for Element {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self, f)
    }
}

impl fmt::Pointer for Element {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Read access to the host's live object graph.
///
/// Liveness is queried at check time, never inferred from the last
/// transition event: hosts are known to drop close events, so a flag is only
/// trusted for as long as its owning element can still be found.
pub trait HostQuery {
    /// Checks whether the UI object behind the handle is still present and
    /// visible. A vanished object must report `false`, not an error.
    fn is_element_visible(&self, element: Element) -> bool;

    /// Reads a raw field at the given byte offset inside the object behind
    /// the handle.
    fn read_field(&self, element: Element, offset: u64) -> Result<u64, Error>;

    /// Forwards a diagnostic message to the host's log. The default
    /// implementation discards the message.
    #[inline]
    fn log_message(&self, text: &str) {
        let _ = text;
    }
}

/// The outbound narration sink.
///
/// Speaking is fire and forget: there is no completion signal and no way to
/// observe the speech queue from the kernel side.
pub trait Narrator {
    /// Queues the text for speech. When `interrupt` is set, in-flight speech
    /// is cancelled first.
    fn speak(&mut self, text: &str, interrupt: bool);
}

/// Logs a diagnostic message by formatting it into a stack allocated buffer
/// with the given capacity. The message may be truncated if it is too long.
#[inline(never)]
pub fn log_limited<const CAP: usize>(host: &impl HostQuery, message: &dyn fmt::Display) {
    let mut buf = arrayvec::ArrayString::<CAP>::new();
    let _ = fmt::Write::write_fmt(&mut buf, format_args!("{message}"));
    host.log_message(&buf);
}
