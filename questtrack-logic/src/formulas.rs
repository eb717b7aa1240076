// Formula leaves: irreducibly multi-variable conditions. Every formula reads
// all of its declared cells unconditionally, so the registry's build-time
// probe can compare observed reads against `Formula::cells` exactly.

use std::cmp::max;

use hashbrown::HashSet;

use crate::GameState;
use questtrack_game::{
    AccessibilityLevel, CellKey, Count, Formula, Item, KeyDoorParams, MEDALLION_MIRE_BIT,
    MEDALLION_TURTLE_ROCK_BIT,
};

/// Records which cells a formula evaluation touched. Used only during
/// registry build to validate declared dependencies.
#[derive(Default)]
pub struct FormulaProbe {
    pub reads: HashSet<CellKey>,
}

fn record(probe: &mut Option<&mut FormulaProbe>, cell: CellKey) {
    if let Some(p) = probe.as_deref_mut() {
        p.reads.insert(cell);
    }
}

pub fn evaluate(
    formula: Formula,
    state: &GameState,
    mut probe: Option<&mut FormulaProbe>,
) -> AccessibilityLevel {
    match formula {
        Formula::MireMedallion => medallion_check(state, &mut probe, MEDALLION_MIRE_BIT),
        Formula::TurtleRockMedallion => {
            medallion_check(state, &mut probe, MEDALLION_TURTLE_ROCK_BIT)
        }
        _ => {
            let params = formula.key_door_params().unwrap();
            key_door(state, &mut probe, &params)
        }
    }
}

// A medallion entrance is satisfied when, for each medallion, either the
// 2-bit dungeon setting does not assign it to this dungeon, or the medallion
// itself is held.
fn medallion_check(
    state: &GameState,
    probe: &mut Option<&mut FormulaProbe>,
    dungeon_bit: Count,
) -> AccessibilityLevel {
    const MEDALLIONS: [(Item, Item); 3] = [
        (Item::Bombos, Item::BombosDungeons),
        (Item::Ether, Item::EtherDungeons),
        (Item::Quake, Item::QuakeDungeons),
    ];
    let mut level = AccessibilityLevel::Normal;
    for (medallion, setting) in MEDALLIONS {
        record(probe, CellKey::Item(medallion));
        record(probe, CellKey::Item(setting));
        let required = state.item_count(setting) & dungeon_bit != 0;
        let held = state.has_item(medallion);
        if required && !held {
            level = AccessibilityLevel::None;
        }
    }
    level
}

// Key-door arithmetic. With keys shuffled into the wild the worst-case count
// of doors before this one must be covered by keys on hand; with vanilla
// in-dungeon keys, every dungeon section reachable past the door by other
// means holds a key chest that relaxes the requirement by one. Generic keys
// add the shared key pool to whatever dungeon keys are held.
fn key_door(
    state: &GameState,
    probe: &mut Option<&mut FormulaProbe>,
    params: &KeyDoorParams,
) -> AccessibilityLevel {
    record(probe, CellKey::Mode);
    record(probe, CellKey::SmallKeys(params.dungeon));
    record(probe, CellKey::Item(Item::SmallKey));
    for &node in params.sections_beyond {
        record(probe, CellKey::Node(node));
    }

    let unlocked = match params.unlocked_by {
        Some(item) => {
            record(probe, CellKey::Item(item));
            state.has_item(item)
        }
        None => false,
    };

    let generic_pool = state.item_count(Item::SmallKey);
    let mut have = state.small_keys(params.dungeon);
    if state.mode().generic_keys {
        have += generic_pool;
    }
    let sections_reachable = state.reachable_count(params.sections_beyond);
    let needed = if state.mode().small_key_shuffle {
        params.doors_before
    } else {
        max(0, params.doors_before - sections_reachable)
    };

    if unlocked || have >= needed {
        AccessibilityLevel::Normal
    } else {
        AccessibilityLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questtrack_game::{Dungeon, Node};

    #[test]
    fn test_medallion_setting_bits() {
        let mut state = GameState::default();
        // Bombos assigned to Mire only: Mire needs Bombos, Turtle Rock is free.
        state.items[Item::BombosDungeons as usize] = 1;
        assert_eq!(
            evaluate(Formula::MireMedallion, &state, None),
            AccessibilityLevel::None
        );
        assert_eq!(
            evaluate(Formula::TurtleRockMedallion, &state, None),
            AccessibilityLevel::Normal
        );
        state.items[Item::Bombos as usize] = 1;
        assert_eq!(
            evaluate(Formula::MireMedallion, &state, None),
            AccessibilityLevel::Normal
        );
        // Assigned to both dungeons: Turtle Rock now needs it too, and already
        // has it.
        state.items[Item::BombosDungeons as usize] = 3;
        assert_eq!(
            evaluate(Formula::TurtleRockMedallion, &state, None),
            AccessibilityLevel::Normal
        );
    }

    #[test]
    fn test_key_door_vanilla_keys_relaxed_by_sections() {
        let mut state = GameState::default();
        // Swamp back door wants 6 keys worst-case, no keys held.
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::None
        );
        state.small_keys[Dungeon::SwampPalace as usize] = 5;
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::None
        );
        // The section beyond is reachable through a shuffled entrance, so its
        // key chest covers the last door.
        state.node_levels[Node::SwampPalaceBack as usize] = AccessibilityLevel::Normal;
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::Normal
        );
    }

    #[test]
    fn test_key_door_shuffled_keys_ignore_sections() {
        let mut state = GameState::default();
        state.mode.small_key_shuffle = true;
        state.node_levels[Node::SwampPalaceBack as usize] = AccessibilityLevel::Normal;
        state.small_keys[Dungeon::SwampPalace as usize] = 5;
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::None
        );
        state.small_keys[Dungeon::SwampPalace as usize] = 6;
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::Normal
        );
    }

    #[test]
    fn test_key_door_generic_pool() {
        let mut state = GameState::default();
        state.mode.small_key_shuffle = true;
        state.items[Item::SmallKey as usize] = 6;
        // Pool ignored until generic keys mode is on.
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::None
        );
        state.mode.generic_keys = true;
        assert_eq!(
            evaluate(Formula::SwampPalaceBackKeyDoor, &state, None),
            AccessibilityLevel::Normal
        );
    }

    #[test]
    fn test_key_door_unlock_item_bypasses_keys() {
        let mut state = GameState::default();
        state.mode.small_key_shuffle = true;
        assert_eq!(
            evaluate(Formula::PalaceOfDarknessFrontKeyDoor, &state, None),
            AccessibilityLevel::None
        );
        state.items[Item::Bow as usize] = 1;
        assert_eq!(
            evaluate(Formula::PalaceOfDarknessFrontKeyDoor, &state, None),
            AccessibilityLevel::Normal
        );
    }

    #[test]
    fn test_probe_matches_declared_cells() {
        use questtrack_game::NUM_FORMULAS;
        let empty = GameState::default();
        for idx in 0..NUM_FORMULAS {
            let formula = Formula::try_from(idx).unwrap();
            let mut probe = FormulaProbe::default();
            evaluate(formula, &empty, Some(&mut probe));
            let declared: HashSet<CellKey> = formula.cells().into_iter().collect();
            assert_eq!(probe.reads, declared, "formula {formula:?}");
        }
    }
}
