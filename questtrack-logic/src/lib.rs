pub mod evaluate;
pub mod formulas;

use questtrack_game::{
    AccessibilityLevel, Count, Dungeon, Item, Mode, Node, Prize, Trick, NUM_DUNGEONS, NUM_ITEMS,
    NUM_NODES, NUM_PRIZES, NUM_TRICKS,
};
use serde::{Deserialize, Serialize};

/// Snapshot of everything the condition graph reads: inventory, prizes,
/// per-dungeon keys, trick toggles, mode, and the externally computed node
/// levels. Evaluation treats this as read-only; mutation happens in the
/// engine, which owns one of these.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub items: Vec<Count>,
    pub prizes: Vec<Count>,
    pub small_keys: Vec<Count>,
    pub big_keys: Vec<Count>,
    pub tricks: Vec<bool>,
    pub mode: Mode,
    pub node_levels: Vec<AccessibilityLevel>,
}

impl GameState {
    pub fn new(mode: Mode) -> Self {
        GameState {
            items: vec![0; NUM_ITEMS],
            prizes: vec![0; NUM_PRIZES],
            small_keys: vec![0; NUM_DUNGEONS],
            big_keys: vec![0; NUM_DUNGEONS],
            tricks: vec![false; NUM_TRICKS],
            mode,
            node_levels: vec![AccessibilityLevel::None; NUM_NODES],
        }
    }

    pub fn item_count(&self, item: Item) -> Count {
        self.items[item as usize]
    }

    pub fn has_item(&self, item: Item) -> bool {
        self.item_count(item) >= 1
    }

    pub fn prize_count(&self, prize: Prize) -> Count {
        self.prizes[prize as usize]
    }

    pub fn small_keys(&self, dungeon: Dungeon) -> Count {
        self.small_keys[dungeon as usize]
    }

    pub fn big_key_held(&self, dungeon: Dungeon) -> bool {
        self.big_keys[dungeon as usize] >= 1
    }

    pub fn trick_enabled(&self, trick: Trick) -> bool {
        self.tricks[trick as usize]
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn node_level(&self, node: Node) -> AccessibilityLevel {
        self.node_levels[node as usize]
    }

    /// How many of the given nodes are currently reachable. Trick-assisted
    /// reachability counts: capping to SequenceBreak happens at the condition
    /// layer, not here.
    pub fn reachable_count(&self, nodes: &[Node]) -> Count {
        nodes
            .iter()
            .filter(|&&node| self.node_level(node) >= AccessibilityLevel::SequenceBreak)
            .count() as Count
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(Mode::default())
    }
}
