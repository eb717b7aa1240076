use crate::formulas;
use crate::GameState;
use questtrack_game::{AccessibilityLevel, ConditionDef};

/// Pure, from-scratch evaluation of a definition tree against a snapshot.
/// `defs` is the full table, used to resolve `Ref` children; the table must
/// already have passed registry validation (in particular, no `Ref` cycles).
pub fn evaluate(
    def: &ConditionDef,
    state: &GameState,
    defs: &[ConditionDef],
) -> AccessibilityLevel {
    match def {
        ConditionDef::Always => AccessibilityLevel::Normal,
        ConditionDef::Never => AccessibilityLevel::None,
        ConditionDef::ItemThreshold { item, min, max } => {
            let count = state.item_count(*item);
            AccessibilityLevel::from_bool(count >= *min && max.map_or(true, |m| count <= m))
        }
        ConditionDef::ItemExact { item, value } => {
            AccessibilityLevel::from_bool(state.item_count(*item) == *value)
        }
        ConditionDef::ItemMask { item, mask } => {
            AccessibilityLevel::from_bool(state.item_count(*item) & *mask == *mask)
        }
        ConditionDef::PrizeThreshold { prize, min } => {
            AccessibilityLevel::from_bool(state.prize_count(*prize) >= *min)
        }
        ConditionDef::SmallKeyThreshold { dungeon, min } => {
            AccessibilityLevel::from_bool(state.small_keys(*dungeon) >= *min)
        }
        ConditionDef::BigKeyHeld(dungeon) => {
            AccessibilityLevel::from_bool(state.big_key_held(*dungeon))
        }
        ConditionDef::ModeFlag(req) => AccessibilityLevel::from_bool(req.is_satisfied(state.mode())),
        ConditionDef::Trick(trick) => {
            if state.trick_enabled(*trick) {
                AccessibilityLevel::SequenceBreak
            } else {
                AccessibilityLevel::None
            }
        }
        ConditionDef::NodeLevel { node, cap } => state
            .node_level(*node)
            .meet(cap.unwrap_or(AccessibilityLevel::Normal)),
        ConditionDef::Formula(formula) => formulas::evaluate(*formula, state, None),
        ConditionDef::AllOf(children) => {
            AccessibilityLevel::meet_all(children.iter().map(|c| evaluate(c, state, defs)))
        }
        ConditionDef::AnyOf(children) => {
            AccessibilityLevel::join_all(children.iter().map(|c| evaluate(c, state, defs)))
        }
        ConditionDef::CapAt { child, max } => evaluate(child, state, defs).meet(*max),
        ConditionDef::Ref(id) => evaluate(&defs[*id as usize], state, defs),
    }
}
