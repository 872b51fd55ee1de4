//! The menu state registry: the single source of truth for which screen
//! currently owns narration.

use arrayvec::ArrayVec;

use crate::{
    host::Element,
    screen::{Screen, ScreenSet},
};

/// The maximum number of reset hooks that can be registered.
pub const MAX_RESET_HOOKS: usize = 32;

/// A callback invoked with the screen that just stopped owning narration.
pub type ResetHook = fn(Screen);

struct HookEntry {
    screens: ScreenSet,
    callback: ResetHook,
}

/// Tracks an "owns narration" flag per [`Screen`].
///
/// At most one screen should be active at a time in normal operation;
/// [`set_active_exclusive`](Self::set_active_exclusive) enforces this by
/// clearing every other flag first. Screens that were never touched report
/// inactive, and no operation panics.
///
/// Activation may record the [`Element`] that presented the screen, so
/// later suppression checks can confirm the screen still exists instead of
/// trusting the last transition event.
pub struct MenuStateRegistry {
    active: ScreenSet,
    elements: [Option<Element>; Screen::COUNT],
    hooks: ArrayVec<HookEntry, MAX_RESET_HOOKS>,
}

impl Default for MenuStateRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStateRegistry {
    /// Creates a new registry with every screen inactive.
    #[inline]
    pub const fn new() -> Self {
        Self {
            active: ScreenSet::empty(),
            elements: [None; Screen::COUNT],
            hooks: ArrayVec::new_const(),
        }
    }

    /// Checks whether the screen currently owns narration.
    #[inline]
    pub fn is_active(&self, screen: Screen) -> bool {
        self.active.contains(screen.flag())
    }

    /// The set of currently active screens.
    #[inline]
    pub fn active(&self) -> ScreenSet {
        self.active
    }

    /// The owning element recorded when the screen was activated, if any.
    #[inline]
    pub fn element(&self, screen: Screen) -> Option<Element> {
        self.elements[screen.index()]
    }

    /// Sets or clears one screen's flag without touching any other screen.
    /// Clearing an active flag runs the reset hooks.
    pub fn set_active(&mut self, screen: Screen, active: bool) {
        if active {
            self.active |= screen.flag();
        } else {
            self.deactivate(screen);
        }
    }

    /// Activates the screen and records the element that presented it.
    pub fn set_active_with(&mut self, screen: Screen, element: Element) {
        self.active |= screen.flag();
        self.elements[screen.index()] = Some(element);
    }

    /// Activates the screen and deactivates every other screen, running
    /// their reset hooks. Returns the set of screens that got deactivated.
    pub fn set_active_exclusive(&mut self, screen: Screen) -> ScreenSet {
        let cleared = self.clear(self.active.difference(screen.flag()));
        self.active |= screen.flag();
        cleared
    }

    /// Like [`set_active_exclusive`](Self::set_active_exclusive), but also
    /// records the element that presented the screen.
    pub fn set_active_exclusive_with(&mut self, screen: Screen, element: Element) -> ScreenSet {
        let cleared = self.set_active_exclusive(screen);
        self.elements[screen.index()] = Some(element);
        cleared
    }

    /// Deactivates the screen, forgetting its recorded element and running
    /// the reset hooks. Returns whether the screen had been active.
    pub fn deactivate(&mut self, screen: Screen) -> bool {
        !self.clear(screen.flag()).is_empty()
    }

    /// Deactivates every screen. Returns the set of screens that had been
    /// active.
    pub fn deactivate_all(&mut self) -> ScreenSet {
        self.clear(self.active)
    }

    /// Registers a callback to run whenever one of the given screens stops
    /// owning narration, so observers can drop per-screen sub-state (last
    /// selected index, cached name, ...). If the hook table is full the hook
    /// is dropped.
    pub fn on_reset(&mut self, screens: ScreenSet, callback: ResetHook) {
        let _ = self.hooks.try_push(HookEntry { screens, callback });
    }

    fn clear(&mut self, screens: ScreenSet) -> ScreenSet {
        let cleared = self.active.intersection(screens);
        self.active.remove(cleared);
        for screen in Screen::ALL {
            if !cleared.contains(screen.flag()) {
                continue;
            }
            self.elements[screen.index()] = None;
            // Hooks run after the flag is already cleared.
            for hook in &self.hooks {
                if hook.screens.contains(screen.flag()) {
                    (hook.callback)(screen);
                }
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn untouched_screens_default_to_inactive() {
        let registry = MenuStateRegistry::new();
        for screen in Screen::ALL {
            assert!(!registry.is_active(screen));
            assert!(registry.element(screen).is_none());
        }
    }

    #[test]
    fn exclusive_activation_clears_every_other_screen() {
        let mut registry = MenuStateRegistry::new();
        for a in Screen::ALL {
            registry.set_active(a, true);
        }
        for a in Screen::ALL {
            let cleared = registry.set_active_exclusive(a);
            assert!(registry.is_active(a));
            for b in Screen::ALL {
                if a != b {
                    assert!(!registry.is_active(b));
                    assert!(cleared.contains(b.flag()));
                }
            }
            // Restore for the next round.
            for b in Screen::ALL {
                registry.set_active(b, true);
            }
        }
    }

    #[test]
    fn set_active_leaves_other_screens_alone() {
        let mut registry = MenuStateRegistry::new();
        registry.set_active(Screen::Magic, true);
        registry.set_active(Screen::Battle, true);
        assert!(registry.is_active(Screen::Magic));
        assert!(registry.is_active(Screen::Battle));
        registry.set_active(Screen::Magic, false);
        assert!(!registry.is_active(Screen::Magic));
        assert!(registry.is_active(Screen::Battle));
    }

    #[test]
    fn deactivation_forgets_the_recorded_element() {
        let mut registry = MenuStateRegistry::new();
        registry.set_active_with(Screen::Shop, Element::new(0xDEAD));
        assert_eq!(registry.element(Screen::Shop), Some(Element::new(0xDEAD)));
        assert!(registry.deactivate(Screen::Shop));
        assert_eq!(registry.element(Screen::Shop), None);
        assert!(!registry.deactivate(Screen::Shop));
    }

    static MAGIC_RESETS: AtomicU32 = AtomicU32::new(0);

    #[test]
    fn reset_hooks_fire_on_every_deactivation_path() {
        MAGIC_RESETS.store(0, Ordering::Relaxed);
        let mut registry = MenuStateRegistry::new();
        registry.on_reset(ScreenSet::MAGIC, |screen| {
            assert_eq!(screen, Screen::Magic);
            MAGIC_RESETS.fetch_add(1, Ordering::Relaxed);
        });

        registry.set_active(Screen::Magic, true);
        registry.deactivate(Screen::Magic);
        assert_eq!(MAGIC_RESETS.load(Ordering::Relaxed), 1);

        registry.set_active(Screen::Magic, true);
        registry.set_active_exclusive(Screen::Battle);
        assert_eq!(MAGIC_RESETS.load(Ordering::Relaxed), 2);

        // Inactive screens do not fire.
        registry.deactivate(Screen::Magic);
        registry.set_active(Screen::Battle, false);
        assert_eq!(MAGIC_RESETS.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn overflowing_the_hook_table_is_a_no_op() {
        let mut registry = MenuStateRegistry::new();
        for _ in 0..MAX_RESET_HOOKS + 4 {
            registry.on_reset(ScreenSet::all(), |_| {});
        }
        registry.set_active(Screen::Item, true);
        registry.deactivate(Screen::Item);
    }
}
