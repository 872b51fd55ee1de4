//! The arbitration kernel: one object tying the registry, the deduplicator
//! and the host boundary together.
//!
//! The kernel is an explicit context object handed to every observer rather
//! than a hidden global. The host drives it from one logical game thread;
//! nothing in here blocks, allocates or reads the clock on its own.

use time::Duration;

use crate::{
    announce::Announcement,
    dedup::{Deduplicator, Observed},
    host::{Element, HostQuery, Narrator},
    registry::{MenuStateRegistry, ResetHook},
    screen::{Context, Screen, ScreenSet},
    DebounceConfig,
};

/// Arbitrates which of many concurrent UI observers may speak.
///
/// An observer that detects a UI event asks the kernel three things in one
/// call to [`notify`](Self::notify): does my screen currently own narration,
/// is the observed value novel, and may I therefore speak. Screen ownership
/// changes go through the activation methods, which keep the deduplicator in
/// sync by resetting the contexts of every screen that loses ownership.
///
/// A screen's lifecycle is `Inactive -> Active` on its first validated event
/// and back to `Inactive` on an explicit close event or on a failed liveness
/// re-check. There are no other states and nothing persists across screens.
pub struct Kernel {
    registry: MenuStateRegistry,
    dedup: Deduplicator,
}

impl Default for Kernel {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// Creates a kernel with the default debounce tuning and every screen
    /// inactive.
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(DebounceConfig::new())
    }

    /// Creates a kernel with the given debounce tuning.
    #[inline]
    pub const fn with_config(config: DebounceConfig) -> Self {
        Self {
            registry: MenuStateRegistry::new(),
            dedup: Deduplicator::with_config(config),
        }
    }

    /// The underlying registry.
    #[inline]
    pub fn registry(&self) -> &MenuStateRegistry {
        &self.registry
    }

    /// The underlying deduplicator.
    #[inline]
    pub fn dedup(&self) -> &Deduplicator {
        &self.dedup
    }

    /// Mutable access to the underlying deduplicator, for call sites that
    /// want novelty checks without screen arbitration.
    #[inline]
    pub fn dedup_mut(&mut self) -> &mut Deduplicator {
        &mut self.dedup
    }

    /// Checks whether the screen currently owns narration.
    #[inline]
    pub fn is_active(&self, screen: Screen) -> bool {
        self.registry.is_active(screen)
    }

    /// Sets or clears one screen's flag without touching any other screen.
    pub fn set_active(&mut self, screen: Screen, active: bool) {
        if active {
            self.registry.set_active(screen, true);
        } else if self.registry.deactivate(screen) {
            self.dedup.reset_set(screen.contexts());
        }
    }

    /// Activates the screen, recording the element that presented it for
    /// later liveness checks, without touching any other screen.
    pub fn set_active_with(&mut self, screen: Screen, element: Element) {
        self.registry.set_active_with(screen, element);
    }

    /// Grants the screen exclusive narration ownership: every other screen
    /// is deactivated first, running reset hooks and forgetting its
    /// deduplication state.
    pub fn set_active_exclusive(&mut self, screen: Screen) {
        let cleared = self.registry.set_active_exclusive(screen);
        self.reset_contexts_of(cleared);
    }

    /// Like [`set_active_exclusive`](Self::set_active_exclusive), but also
    /// records the element that presented the screen.
    pub fn set_active_exclusive_with(&mut self, screen: Screen, element: Element) {
        let cleared = self.registry.set_active_exclusive_with(screen, element);
        self.reset_contexts_of(cleared);
    }

    /// Deactivates every screen, as on a hard transition like a scene load.
    pub fn deactivate_all(&mut self) {
        let cleared = self.registry.deactivate_all();
        self.reset_contexts_of(cleared);
    }

    /// Registers a reset hook on the registry.
    #[inline]
    pub fn on_reset(&mut self, screens: ScreenSet, callback: ResetHook) {
        self.registry.on_reset(screens, callback);
    }

    /// Decides whether an observer may speak about `value`: true iff the
    /// context's owning screen currently owns narration and the value is
    /// novel under the context's debounce policy.
    ///
    /// `now` is the host clock sampled by the caller at event time.
    pub fn notify(&mut self, context: Context, value: Observed<'_>, now: Duration) -> bool {
        if !self.registry.is_active(context.screen()) {
            return false;
        }
        self.dedup.should_announce(context, value, now)
    }

    /// Runs the full pipeline for an assembled announcement: arbitration,
    /// deduplication keyed on the exact spoken text, then speech. Returns
    /// whether the announcement was spoken.
    pub fn announce<const CAP: usize>(
        &mut self,
        narrator: &mut impl Narrator,
        context: Context,
        announcement: &Announcement<CAP>,
        now: Duration,
    ) -> bool {
        if announcement.is_empty() || !self.notify(context, announcement.observed(), now) {
            return false;
        }
        announcement.speak(narrator);
        true
    }

    /// Checks whether a generic narrator should stay quiet because `screen`
    /// owns narration.
    ///
    /// True exactly when the screen's flag is active and the host confirms
    /// the recorded owning element is still visible. A flag whose element
    /// has vanished is stale (the host never fired the close event); it is
    /// cleared on the spot and `false` is returned, so a flag never remains
    /// set once its owning UI is confirmed absent. Healing is idempotent:
    /// the next query takes the plain inactive path.
    ///
    /// Screens activated without a recorded element cannot be re-validated
    /// and are trusted as long as their flag is set.
    pub fn should_suppress(&mut self, host: &impl HostQuery, screen: Screen) -> bool {
        if !self.registry.is_active(screen) {
            return false;
        }
        match self.registry.element(screen) {
            Some(element) if !host.is_element_visible(element) => {
                self.heal(host, screen);
                false
            }
            _ => true,
        }
    }

    /// Per-frame poll: re-validates the liveness of every active screen and
    /// heals stale flags, so a missed close event cannot leave a screen
    /// suppressing narration between queries.
    pub fn tick(&mut self, host: &impl HostQuery) {
        let active = self.registry.active();
        for screen in Screen::ALL {
            if !active.contains(screen.flag()) {
                continue;
            }
            if let Some(element) = self.registry.element(screen) {
                if !host.is_element_visible(element) {
                    self.heal(host, screen);
                }
            }
        }
    }

    fn heal(&mut self, host: &impl HostQuery, screen: Screen) {
        self.registry.deactivate(screen);
        self.dedup.reset_set(screen.contexts());
        crate::host::log_limited::<64>(
            host,
            &format_args!("healed stale narration flag: {}", screen.name()),
        );
    }

    fn reset_contexts_of(&mut self, screens: ScreenSet) {
        for screen in Screen::ALL {
            if screens.contains(screen.flag()) {
                self.dedup.reset_set(screen.contexts());
            }
        }
    }
}
