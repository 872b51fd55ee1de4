//! Assembling announcement text without an allocator.
//!
//! Announcements are built into a stack allocated buffer and handed to the
//! [`Narrator`] as a plain `&str`. If the buffer runs out the text is
//! truncated rather than failing; a clipped announcement is still better
//! than a missing one.

use core::fmt;

use arrayvec::ArrayString;

use crate::{dedup::Observed, host::Narrator};

/// An ephemeral spoken-text announcement with an interrupt flag.
///
/// The interrupt flag decides whether in-flight speech is cancelled when
/// this announcement is queued. Cursor movement narration typically
/// interrupts, ambient narration does not.
#[derive(Debug, Clone)]
pub struct Announcement<const CAP: usize = 256> {
    text: ArrayString<CAP>,
    interrupt: bool,
}

impl<const CAP: usize> Default for Announcement<CAP> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> Announcement<CAP> {
    /// Creates an empty announcement that does not interrupt.
    #[inline]
    pub const fn new() -> Self {
        Self {
            text: ArrayString::new_const(),
            interrupt: false,
        }
    }

    /// Creates an empty announcement that cancels in-flight speech.
    #[inline]
    pub const fn interrupting() -> Self {
        Self {
            text: ArrayString::new_const(),
            interrupt: true,
        }
    }

    /// Whether the announcement cancels in-flight speech.
    #[inline]
    pub const fn interrupt(&self) -> bool {
        self.interrupt
    }

    /// Sets whether the announcement cancels in-flight speech.
    #[inline]
    pub fn set_interrupt(&mut self, interrupt: bool) {
        self.interrupt = interrupt;
    }

    /// The text built so far.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Checks whether no text has been built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends text, truncating on a character boundary if the buffer is
    /// full.
    pub fn push_str(&mut self, text: &str) {
        let room = CAP - self.text.len();
        let _ = self
            .text
            .try_push_str(crate::dedup::truncated(text, room));
    }

    /// Appends a separator if there already is text, so fragments read as
    /// "Fire, 3 MP" rather than running together.
    pub fn push_separated(&mut self, text: &str) {
        if !self.text.is_empty() {
            self.push_str(", ");
        }
        self.push_str(text);
    }

    /// Appends an integer without allocating.
    #[cfg(feature = "integer-vars")]
    pub fn push_int(&mut self, value: impl itoa::Integer) {
        let mut buf = itoa::Buffer::new();
        self.push_str(buf.format(value));
    }

    /// Appends a floating point number without allocating.
    #[cfg(feature = "float-vars")]
    pub fn push_float(&mut self, value: impl ryu::Float) {
        let mut buf = ryu::Buffer::new();
        self.push_str(buf.format(value));
    }

    /// The announcement text as a deduplication observation, so call sites
    /// can key novelty on exactly what would be spoken.
    #[inline]
    pub fn observed(&self) -> Observed<'_> {
        Observed::Text(self.as_str())
    }

    /// Hands the announcement to the narrator. Empty announcements are not
    /// spoken.
    pub fn speak(&self, narrator: &mut impl Narrator) {
        if !self.text.is_empty() {
            narrator.speak(&self.text, self.interrupt);
        }
    }

    /// Copies the text into an owned string.
    #[cfg(feature = "alloc")]
    pub fn to_owned_text(&self) -> alloc::string::String {
        alloc::string::String::from(self.as_str())
    }
}

impl<const CAP: usize> fmt::Write for Announcement<CAP> {
    /// Writes truncate instead of failing when the buffer is full.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// Speaks a message by formatting it into a stack allocated buffer with the
/// given capacity. The message may be truncated if it is too long.
///
/// # Example
///
/// ```no_run
/// # fn example(narrator: &mut impl menuvox::Narrator) {
/// menuvox::announce::speak_limited::<128>(
///     narrator,
///     &format_args!("{} selected", "Fire"),
///     true,
/// );
/// # }
/// ```
#[inline(never)]
pub fn speak_limited<const CAP: usize>(
    narrator: &mut impl Narrator,
    message: &dyn fmt::Display,
    interrupt: bool,
) {
    let mut buf = ArrayString::<CAP>::new();
    let _ = fmt::Write::write_fmt(&mut buf, format_args!("{message}"));
    narrator.speak(&buf, interrupt);
}
