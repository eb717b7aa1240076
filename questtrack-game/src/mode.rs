use serde::{Deserialize, Serialize};

/// Map configuration for the tracked game. One value of this struct is a
/// single state cell: any field mutation fires one change notification.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mode {
    pub item_placement: ItemPlacement,
    pub world_state: WorldState,
    pub entrance_shuffle: EntranceShuffle,
    pub small_key_shuffle: bool,
    pub big_key_shuffle: bool,
    pub generic_keys: bool,
    pub boss_shuffle: bool,
    pub enemy_shuffle: bool,
    pub guaranteed_boss_items: bool,
    pub take_any_locations: bool,
}

impl Default for Mode {
    fn default() -> Self {
        Mode {
            item_placement: ItemPlacement::Advanced,
            world_state: WorldState::StandardOpen,
            entrance_shuffle: EntranceShuffle::None,
            small_key_shuffle: false,
            big_key_shuffle: false,
            generic_keys: false,
            boss_shuffle: false,
            enemy_shuffle: false,
            guaranteed_boss_items: false,
            take_any_locations: false,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemPlacement {
    Basic,
    Advanced,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WorldState {
    StandardOpen,
    Inverted,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntranceShuffle {
    None,
    Dungeon,
    All,
    Insanity,
}

/// A binary gate on one mode field: satisfied iff the field equals the
/// required value. No partial credit.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModeRequirement {
    ItemPlacement(ItemPlacement),
    WorldState(WorldState),
    EntranceShuffle(EntranceShuffle),
    SmallKeyShuffle(bool),
    BigKeyShuffle(bool),
    GenericKeys(bool),
    BossShuffle(bool),
    EnemyShuffle(bool),
    GuaranteedBossItems(bool),
    TakeAnyLocations(bool),
}

impl ModeRequirement {
    pub fn is_satisfied(self, mode: &Mode) -> bool {
        match self {
            ModeRequirement::ItemPlacement(value) => mode.item_placement == value,
            ModeRequirement::WorldState(value) => mode.world_state == value,
            ModeRequirement::EntranceShuffle(value) => mode.entrance_shuffle == value,
            ModeRequirement::SmallKeyShuffle(value) => mode.small_key_shuffle == value,
            ModeRequirement::BigKeyShuffle(value) => mode.big_key_shuffle == value,
            ModeRequirement::GenericKeys(value) => mode.generic_keys == value,
            ModeRequirement::BossShuffle(value) => mode.boss_shuffle == value,
            ModeRequirement::EnemyShuffle(value) => mode.enemy_shuffle == value,
            ModeRequirement::GuaranteedBossItems(value) => mode.guaranteed_boss_items == value,
            ModeRequirement::TakeAnyLocations(value) => mode.take_any_locations == value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        let mut mode = Mode::default();
        mode.world_state = WorldState::Inverted;
        mode.entrance_shuffle = EntranceShuffle::Dungeon;
        mode.generic_keys = true;
        let json = serde_json::to_string(&mode).unwrap();
        let restored: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, mode);
    }

    #[test]
    fn test_mode_requirement_matching() {
        let mode = Mode::default();
        assert!(ModeRequirement::WorldState(WorldState::StandardOpen).is_satisfied(&mode));
        assert!(!ModeRequirement::WorldState(WorldState::Inverted).is_satisfied(&mode));
        assert!(ModeRequirement::GenericKeys(false).is_satisfied(&mode));
        let mut inverted = mode.clone();
        inverted.world_state = WorldState::Inverted;
        inverted.generic_keys = true;
        assert!(ModeRequirement::WorldState(WorldState::Inverted).is_satisfied(&inverted));
        assert!(ModeRequirement::GenericKeys(true).is_satisfied(&inverted));
    }
}
