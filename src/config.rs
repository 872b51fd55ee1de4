//! Debounce tuning.
//!
//! Some hosts fire the same logical UI event more than once per transition.
//! The windows below absorb those duplicates. They are empirically tuned
//! against observed host behavior, not derived from anything, so they are
//! plain configuration that embedders may override per context.

use time::Duration;

use crate::screen::Context;

/// Window for contexts where the host duplicates events back to back.
pub const WINDOW_SHORT: Duration = Duration::milliseconds(100);

/// Window for message-style contexts that the host replays on refocus.
pub const WINDOW_MEDIUM: Duration = Duration::milliseconds(150);

/// Window for contexts the host re-fires across whole screen transitions.
pub const WINDOW_LONG: Duration = Duration::milliseconds(300);

/// How repeats of an identical value are treated within one context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Announce only when the value differs from the last one. An identical
    /// value never re-announces until the context is reset.
    ValueChange,
    /// Like [`ValueChange`](Self::ValueChange), but an identical value does
    /// re-announce once the window has elapsed since it was last announced.
    Window(Duration),
}

/// Per-context debounce policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceConfig {
    policies: [Policy; Context::COUNT],
}

impl DebounceConfig {
    /// The default tuning: cursor-style contexts deduplicate on pure value
    /// change, message-style contexts carry a window because the host is
    /// known to deliver them twice.
    pub const fn new() -> Self {
        let mut policies = [Policy::ValueChange; Context::COUNT];
        policies[Context::FieldPrompt.index()] = Policy::Window(WINDOW_SHORT);
        policies[Context::BattleMessage.index()] = Policy::Window(WINDOW_MEDIUM);
        policies[Context::DialogueLine.index()] = Policy::Window(WINDOW_MEDIUM);
        policies[Context::ShopQuantity.index()] = Policy::Window(WINDOW_LONG);
        Self { policies }
    }

    /// The policy for the given context.
    #[inline]
    pub fn policy(&self, context: Context) -> Policy {
        self.policies[context.index()]
    }

    /// Overrides the policy for the given context.
    #[inline]
    pub fn set_policy(&mut self, context: Context, policy: Policy) {
        self.policies[context.index()] = policy;
    }
}

impl Default for DebounceConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
