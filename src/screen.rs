//! Closed identifier sets for narration-owning screens and announcement
//! contexts.
//!
//! Screens and contexts are deliberately closed enumerations rather than raw
//! strings, so a typo in an observer fails at compile time instead of
//! silently creating a fresh registry entry at runtime.

use core::fmt;

use bitflags::bitflags;

/// A game screen that can own narration. At most one screen owns narration
/// at a time in normal operation; the registry enforces this.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    /// The title menu.
    Title,
    /// Free roaming on the field, including field prompts.
    Field,
    /// The battle screen.
    Battle,
    /// Shop buy / sell menus.
    Shop,
    /// The magic menu.
    Magic,
    /// The item menu.
    Item,
    /// The equipment menu.
    Equip,
    /// Save and load slots.
    Save,
    /// The configuration menu.
    Config,
    /// The character naming screen.
    Naming,
    /// Dialogue boxes and their choice lists.
    Dialogue,
}

/// An announcement context: one independently deduplicated stream of
/// observations. Every context belongs to exactly one [`Screen`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Context {
    /// The focused entry of the title menu.
    TitleChoice,
    /// Interaction prompts shown while roaming the field.
    FieldPrompt,
    /// Battle log messages.
    BattleMessage,
    /// The focused battle command.
    BattleCommand,
    /// The focused battle target.
    BattleTarget,
    /// The focused ware in a shop list.
    ShopWare,
    /// The quantity selector in a shop transaction.
    ShopQuantity,
    /// The focused spell in the magic menu.
    MagicSpell,
    /// The focused slot in the item menu.
    ItemSlot,
    /// The focused slot in the equipment menu.
    EquipSlot,
    /// The focused save slot.
    SaveSlot,
    /// The focused configuration option and its value.
    ConfigOption,
    /// The focused glyph on the naming grid.
    NamingGlyph,
    /// A line of dialogue text.
    DialogueLine,
    /// The focused entry of a dialogue choice list.
    DialogueChoice,
}

bitflags! {
    /// A set of [`Screen`]s.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ScreenSet: u16 {
        const TITLE = 1 << Screen::Title as u16;
        const FIELD = 1 << Screen::Field as u16;
        const BATTLE = 1 << Screen::Battle as u16;
        const SHOP = 1 << Screen::Shop as u16;
        const MAGIC = 1 << Screen::Magic as u16;
        const ITEM = 1 << Screen::Item as u16;
        const EQUIP = 1 << Screen::Equip as u16;
        const SAVE = 1 << Screen::Save as u16;
        const CONFIG = 1 << Screen::Config as u16;
        const NAMING = 1 << Screen::Naming as u16;
        const DIALOGUE = 1 << Screen::Dialogue as u16;
    }
}

bitflags! {
    /// A set of [`Context`]s.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ContextSet: u16 {
        const TITLE_CHOICE = 1 << Context::TitleChoice as u16;
        const FIELD_PROMPT = 1 << Context::FieldPrompt as u16;
        const BATTLE_MESSAGE = 1 << Context::BattleMessage as u16;
        const BATTLE_COMMAND = 1 << Context::BattleCommand as u16;
        const BATTLE_TARGET = 1 << Context::BattleTarget as u16;
        const SHOP_WARE = 1 << Context::ShopWare as u16;
        const SHOP_QUANTITY = 1 << Context::ShopQuantity as u16;
        const MAGIC_SPELL = 1 << Context::MagicSpell as u16;
        const ITEM_SLOT = 1 << Context::ItemSlot as u16;
        const EQUIP_SLOT = 1 << Context::EquipSlot as u16;
        const SAVE_SLOT = 1 << Context::SaveSlot as u16;
        const CONFIG_OPTION = 1 << Context::ConfigOption as u16;
        const NAMING_GLYPH = 1 << Context::NamingGlyph as u16;
        const DIALOGUE_LINE = 1 << Context::DialogueLine as u16;
        const DIALOGUE_CHOICE = 1 << Context::DialogueChoice as u16;
    }
}

impl Screen {
    /// Every screen, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Title,
        Self::Field,
        Self::Battle,
        Self::Shop,
        Self::Magic,
        Self::Item,
        Self::Equip,
        Self::Save,
        Self::Config,
        Self::Naming,
        Self::Dialogue,
    ];

    /// The number of screens.
    pub const COUNT: usize = Self::ALL.len();

    /// The singleton set containing just this screen.
    #[inline]
    pub const fn flag(self) -> ScreenSet {
        ScreenSet::from_bits_truncate(1 << self as u16)
    }

    /// The screen's index, suitable for table lookups.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// A human readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Field => "Field",
            Self::Battle => "Battle",
            Self::Shop => "Shop",
            Self::Magic => "Magic",
            Self::Item => "Item",
            Self::Equip => "Equip",
            Self::Save => "Save",
            Self::Config => "Config",
            Self::Naming => "Naming",
            Self::Dialogue => "Dialogue",
        }
    }

    /// The announcement contexts owned by this screen. These get reset
    /// whenever the screen stops owning narration.
    pub const fn contexts(self) -> ContextSet {
        match self {
            Self::Title => ContextSet::TITLE_CHOICE,
            Self::Field => ContextSet::FIELD_PROMPT,
            Self::Battle => ContextSet::BATTLE_MESSAGE
                .union(ContextSet::BATTLE_COMMAND)
                .union(ContextSet::BATTLE_TARGET),
            Self::Shop => ContextSet::SHOP_WARE.union(ContextSet::SHOP_QUANTITY),
            Self::Magic => ContextSet::MAGIC_SPELL,
            Self::Item => ContextSet::ITEM_SLOT,
            Self::Equip => ContextSet::EQUIP_SLOT,
            Self::Save => ContextSet::SAVE_SLOT,
            Self::Config => ContextSet::CONFIG_OPTION,
            Self::Naming => ContextSet::NAMING_GLYPH,
            Self::Dialogue => ContextSet::DIALOGUE_LINE.union(ContextSet::DIALOGUE_CHOICE),
        }
    }
}

impl Context {
    /// Every context, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::TitleChoice,
        Self::FieldPrompt,
        Self::BattleMessage,
        Self::BattleCommand,
        Self::BattleTarget,
        Self::ShopWare,
        Self::ShopQuantity,
        Self::MagicSpell,
        Self::ItemSlot,
        Self::EquipSlot,
        Self::SaveSlot,
        Self::ConfigOption,
        Self::NamingGlyph,
        Self::DialogueLine,
        Self::DialogueChoice,
    ];

    /// The number of contexts.
    pub const COUNT: usize = Self::ALL.len();

    /// The singleton set containing just this context.
    #[inline]
    pub const fn flag(self) -> ContextSet {
        ContextSet::from_bits_truncate(1 << self as u16)
    }

    /// The context's index, suitable for table lookups.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The screen this context belongs to.
    pub const fn screen(self) -> Screen {
        match self {
            Self::TitleChoice => Screen::Title,
            Self::FieldPrompt => Screen::Field,
            Self::BattleMessage | Self::BattleCommand | Self::BattleTarget => Screen::Battle,
            Self::ShopWare | Self::ShopQuantity => Screen::Shop,
            Self::MagicSpell => Screen::Magic,
            Self::ItemSlot => Screen::Item,
            Self::EquipSlot => Screen::Equip,
            Self::SaveSlot => Screen::Save,
            Self::ConfigOption => Screen::Config,
            Self::NamingGlyph => Screen::Naming,
            Self::DialogueLine | Self::DialogueChoice => Screen::Dialogue,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_ownership_is_consistent() {
        for context in Context::ALL {
            let screen = context.screen();
            assert!(
                screen.contexts().contains(context.flag()),
                "{screen} does not own {context:?}",
            );
        }
    }

    #[test]
    fn screens_own_disjoint_contexts() {
        let mut seen = ContextSet::empty();
        for screen in Screen::ALL {
            assert!(seen.intersection(screen.contexts()).is_empty());
            seen |= screen.contexts();
        }
        assert_eq!(seen, ContextSet::all());
    }

    #[test]
    fn flags_match_declaration_order() {
        for (i, screen) in Screen::ALL.into_iter().enumerate() {
            assert_eq!(screen.index(), i);
            assert_eq!(screen.flag().bits(), 1 << i);
        }
        for (i, context) in Context::ALL.into_iter().enumerate() {
            assert_eq!(context.index(), i);
            assert_eq!(context.flag().bits(), 1 << i);
        }
    }
}
