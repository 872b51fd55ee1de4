//! The announcement deduplicator: decides whether an observed value is worth
//! speaking, per context.
//!
//! Equality is checked on the serialized key of the observation, never on
//! object identity, because hosts fire the same logical event multiple times
//! with equivalent but distinct managed objects.

use arrayvec::{ArrayString, ArrayVec};
use bytemuck::Pod;
use time::Duration;

use crate::{
    config::{DebounceConfig, Policy},
    screen::{Context, ContextSet},
};

/// The capacity of a stored text key. Longer observations are truncated to
/// this many bytes (on a character boundary) before being compared.
pub const TEXT_KEY_CAP: usize = 160;

/// The capacity of a stored raw key. Longer byte images are truncated.
pub const RAW_KEY_CAP: usize = 16;

/// A single observation as reported by an observer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Observed<'a> {
    /// A textual observation, such as a rendered announcement string.
    Text(&'a str),
    /// A numeric observation, such as a cursor index.
    Index(i64),
    /// The raw byte image of a host value.
    Raw(&'a [u8]),
    /// Nothing could be observed. Never announces.
    Absent,
}

impl<'a> Observed<'a> {
    /// Observes the byte image of a plain-old-data host value.
    #[inline]
    pub fn pod<T: Pod>(value: &'a T) -> Self {
        Self::Raw(bytemuck::bytes_of(value))
    }
}

/// The stored key an observation is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Key {
    Text(ArrayString<TEXT_KEY_CAP>),
    Index(i64),
    Raw(ArrayVec<u8, RAW_KEY_CAP>),
}

impl Key {
    fn capture(value: Observed<'_>) -> Option<Self> {
        match value {
            Observed::Text(text) => {
                let mut buf = ArrayString::new();
                let _ = buf.try_push_str(truncated(text, TEXT_KEY_CAP));
                Some(Self::Text(buf))
            }
            Observed::Index(index) => Some(Self::Index(index)),
            Observed::Raw(bytes) => {
                let len = bytes.len().min(RAW_KEY_CAP);
                let mut buf = ArrayVec::new();
                let _ = buf.try_extend_from_slice(&bytes[..len]);
                Some(Self::Raw(buf))
            }
            Observed::Absent => None,
        }
    }
}

struct Slot {
    key: Key,
    stored_at: Duration,
}

/// Keyed last-value cache with optional time debouncing.
///
/// Each [`Context`] stores the last announced key and the clock sample at
/// which it was announced. The host's clock is sampled by the caller and
/// passed in, so the deduplicator itself never reads time.
pub struct Deduplicator {
    slots: [Option<Slot>; Context::COUNT],
    config: DebounceConfig,
}

impl Default for Deduplicator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator {
    /// Creates a deduplicator with the default [`DebounceConfig`].
    pub const fn new() -> Self {
        Self::with_config(DebounceConfig::new())
    }

    /// Creates a deduplicator with the given tuning.
    pub const fn with_config(config: DebounceConfig) -> Self {
        const EMPTY: Option<Slot> = None;
        Self {
            slots: [EMPTY; Context::COUNT],
            config,
        }
    }

    /// The current tuning.
    #[inline]
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Mutable access to the tuning.
    #[inline]
    pub fn config_mut(&mut self) -> &mut DebounceConfig {
        &mut self.config
    }

    /// Decides whether `value` is novel for `context` at time `now`.
    ///
    /// The first observation of a context always announces. A changed value
    /// always announces. An identical value announces only if the context's
    /// policy carries a window and the window has elapsed since the value
    /// was last announced. [`Observed::Absent`] never announces and leaves
    /// the stored key untouched.
    pub fn should_announce(&mut self, context: Context, value: Observed<'_>, now: Duration) -> bool {
        let Some(key) = Key::capture(value) else {
            return false;
        };
        let policy = self.config.policy(context);
        let slot = &mut self.slots[context.index()];
        match slot {
            Some(stored) if stored.key == key => match policy {
                Policy::ValueChange => false,
                Policy::Window(window) => {
                    if now.saturating_sub(stored.stored_at) >= window {
                        stored.stored_at = now;
                        true
                    } else {
                        false
                    }
                }
            },
            _ => {
                *slot = Some(Slot {
                    key,
                    stored_at: now,
                });
                true
            }
        }
    }

    /// Forgets the stored key for the context, so the next observation
    /// reports novelty regardless of prior history.
    #[inline]
    pub fn reset(&mut self, context: Context) {
        self.slots[context.index()] = None;
    }

    /// Forgets the stored keys for every context in the set.
    pub fn reset_set(&mut self, contexts: ContextSet) {
        for context in Context::ALL {
            if contexts.contains(context.flag()) {
                self.slots[context.index()] = None;
            }
        }
    }

    /// Forgets every stored key.
    pub fn reset_all(&mut self) {
        const EMPTY: Option<Slot> = None;
        self.slots = [EMPTY; Context::COUNT];
    }
}

/// The longest prefix of `text` that fits in `cap` bytes without splitting a
/// character.
pub(crate) fn truncated(text: &str, cap: usize) -> &str {
    if text.len() <= cap {
        return text;
    }
    let mut end = cap;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Duration = Duration::ZERO;

    #[test]
    fn first_repeat_and_change() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::MagicSpell, Observed::Text("Fire"), T0));
        assert!(!dedup.should_announce(Context::MagicSpell, Observed::Text("Fire"), T0));
        assert!(dedup.should_announce(Context::MagicSpell, Observed::Text("Blizzard"), T0));
        assert!(!dedup.should_announce(Context::MagicSpell, Observed::Text("Blizzard"), T0));
    }

    #[test]
    fn contexts_are_independent() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::ItemSlot, Observed::Index(3), T0));
        assert!(dedup.should_announce(Context::EquipSlot, Observed::Index(3), T0));
        assert!(!dedup.should_announce(Context::ItemSlot, Observed::Index(3), T0));
    }

    #[test]
    fn reset_forces_novelty() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::SaveSlot, Observed::Index(1), T0));
        dedup.reset(Context::SaveSlot);
        assert!(dedup.should_announce(Context::SaveSlot, Observed::Index(1), T0));
    }

    #[test]
    fn reset_set_only_touches_the_given_contexts() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::BattleCommand, Observed::Index(0), T0));
        assert!(dedup.should_announce(Context::MagicSpell, Observed::Index(0), T0));
        dedup.reset_set(crate::screen::Screen::Battle.contexts());
        assert!(dedup.should_announce(Context::BattleCommand, Observed::Index(0), T0));
        assert!(!dedup.should_announce(Context::MagicSpell, Observed::Index(0), T0));
    }

    #[test]
    fn absent_never_announces_and_keeps_the_key() {
        let mut dedup = Deduplicator::new();
        assert!(!dedup.should_announce(Context::DialogueChoice, Observed::Absent, T0));
        assert!(dedup.should_announce(Context::DialogueChoice, Observed::Index(0), T0));
        assert!(!dedup.should_announce(Context::DialogueChoice, Observed::Absent, T0));
        assert!(!dedup.should_announce(Context::DialogueChoice, Observed::Index(0), T0));
    }

    #[test]
    fn window_suppresses_within_and_reannounces_after() {
        let mut dedup = Deduplicator::new();
        let line = Observed::Text("The beast lunges!");
        assert!(dedup.should_announce(Context::BattleMessage, line, T0));
        assert!(!dedup.should_announce(Context::BattleMessage, line, Duration::milliseconds(50)));
        assert!(!dedup.should_announce(Context::BattleMessage, line, Duration::milliseconds(149)));
        assert!(dedup.should_announce(Context::BattleMessage, line, Duration::milliseconds(150)));
        // The window restarts from the re-announcement.
        assert!(!dedup.should_announce(Context::BattleMessage, line, Duration::milliseconds(250)));
        assert!(dedup.should_announce(Context::BattleMessage, line, Duration::milliseconds(300)));
    }

    #[test]
    fn changed_value_announces_even_inside_the_window() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::DialogueLine, Observed::Text("Hello."), T0));
        assert!(dedup.should_announce(
            Context::DialogueLine,
            Observed::Text("Goodbye."),
            Duration::milliseconds(10),
        ));
    }

    #[test]
    fn value_change_policy_never_reannounces() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::ConfigOption, Observed::Index(7), T0));
        assert!(!dedup.should_announce(Context::ConfigOption, Observed::Index(7), Duration::SECOND));
    }

    #[test]
    fn oversized_text_compares_on_the_truncated_key() {
        let mut long = [b'a'; TEXT_KEY_CAP + 40];
        let first = core::str::from_utf8(&long).unwrap();
        let mut dedup = Deduplicator::new();
        assert!(dedup.should_announce(Context::DialogueLine, Observed::Text(first), T0));
        // Differs only beyond the key capacity, so it is treated as a repeat.
        long[TEXT_KEY_CAP + 20] = b'b';
        let second = core::str::from_utf8(&long).unwrap();
        assert!(!dedup.should_announce(Context::DialogueLine, Observed::Text(second), T0));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut text = ArrayString::<{ TEXT_KEY_CAP + 8 }>::new();
        while text.len() < TEXT_KEY_CAP - 1 {
            text.push('a');
        }
        text.push('ü');
        assert_eq!(truncated(&text, TEXT_KEY_CAP).len(), TEXT_KEY_CAP - 1);
    }

    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct CursorState {
        row: u32,
        column: u32,
    }

    #[test]
    fn pod_values_dedup_on_their_byte_image() {
        let mut dedup = Deduplicator::new();
        let a = CursorState { row: 1, column: 2 };
        let b = CursorState { row: 1, column: 2 };
        let c = CursorState { row: 1, column: 3 };
        assert!(dedup.should_announce(Context::NamingGlyph, Observed::pod(&a), T0));
        assert!(!dedup.should_announce(Context::NamingGlyph, Observed::pod(&b), T0));
        assert!(dedup.should_announce(Context::NamingGlyph, Observed::pod(&c), T0));
    }
}
