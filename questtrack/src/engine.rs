use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};

use questtrack_game::conditions::condition_defs;
use questtrack_game::{
    AccessibilityLevel, CellKey, ConditionDef, ConditionId, Count, Dungeon, Formula, Item, Mode,
    Node, Prize, Trick, NUM_CONDITIONS, NUM_FORMULAS,
};
use questtrack_logic::evaluate::evaluate;
use questtrack_logic::formulas::{self, FormulaProbe};
use questtrack_logic::GameState;

pub type NodeIdx = usize; // Index into Tracker.nodes; children always precede their parents.

enum GraphKind {
    Leaf(ConditionDef),
    AllOf,
    AnyOf,
    CapAt(AccessibilityLevel),
}

struct GraphNode {
    kind: GraphKind,
    children: Vec<NodeIdx>,
    parents: Vec<NodeIdx>,
    level: AccessibilityLevel,
}

/// The live condition graph. Owns the mutable game state; every setter doubles
/// as the change notification for its cell, and propagation recomputes only
/// the affected subgraph.
pub struct Tracker {
    state: GameState,
    defs: Vec<ConditionDef>,
    nodes: Vec<GraphNode>,
    roots: Vec<NodeIdx>, // by ConditionId as usize
    ids_by_root: HashMap<NodeIdx, Vec<ConditionId>>,
    subscriptions: HashMap<CellKey, Vec<NodeIdx>>,
    dirty: BTreeSet<NodeIdx>,
    batch_depth: usize,
    observers: Vec<Box<dyn FnMut(ConditionId, AccessibilityLevel)>>,
}

struct GraphBuilder<'a> {
    defs: &'a [ConditionDef],
    nodes: Vec<GraphNode>,
    leaf_index: HashMap<ConditionDef, NodeIdx>,
    root_by_id: Vec<Option<NodeIdx>>,
    building: Vec<bool>,
    subscriptions: HashMap<CellKey, Vec<NodeIdx>>,
}

impl<'a> GraphBuilder<'a> {
    fn new(defs: &'a [ConditionDef]) -> Self {
        GraphBuilder {
            defs,
            nodes: vec![],
            leaf_index: HashMap::new(),
            root_by_id: vec![None; NUM_CONDITIONS],
            building: vec![false; NUM_CONDITIONS],
            subscriptions: HashMap::new(),
        }
    }

    // Memoized, on-demand construction: a condition referenced by several
    // others is built once and shared.
    fn build_condition(&mut self, id: ConditionId) -> Result<NodeIdx> {
        if let Some(idx) = self.root_by_id[id as usize] {
            return Ok(idx);
        }
        if self.building[id as usize] {
            bail!("condition reference cycle through {id:?}");
        }
        self.building[id as usize] = true;
        let def = self.defs[id as usize].clone();
        let idx = self.build_def(&def)?;
        self.building[id as usize] = false;
        self.root_by_id[id as usize] = Some(idx);
        Ok(idx)
    }

    fn build_def(&mut self, def: &ConditionDef) -> Result<NodeIdx> {
        match def {
            ConditionDef::Ref(id) => self.build_condition(*id),
            ConditionDef::AllOf(children) => {
                let child_idxs = children
                    .iter()
                    .map(|c| self.build_def(c))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.push_composite(GraphKind::AllOf, child_idxs))
            }
            ConditionDef::AnyOf(children) => {
                let child_idxs = children
                    .iter()
                    .map(|c| self.build_def(c))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.push_composite(GraphKind::AnyOf, child_idxs))
            }
            ConditionDef::CapAt { child, max } => {
                let child_idx = self.build_def(child)?;
                Ok(self.push_composite(GraphKind::CapAt(*max), vec![child_idx]))
            }
            leaf => Ok(self.intern_leaf(leaf)),
        }
    }

    fn intern_leaf(&mut self, def: &ConditionDef) -> NodeIdx {
        debug_assert!(def.is_leaf());
        if let Some(&idx) = self.leaf_index.get(def) {
            return idx;
        }
        let idx = self.nodes.len();
        for cell in def.cells() {
            self.subscriptions.entry(cell).or_default().push(idx);
        }
        self.nodes.push(GraphNode {
            kind: GraphKind::Leaf(def.clone()),
            children: vec![],
            parents: vec![],
            level: AccessibilityLevel::None,
        });
        self.leaf_index.insert(def.clone(), idx);
        idx
    }

    fn push_composite(&mut self, kind: GraphKind, children: Vec<NodeIdx>) -> NodeIdx {
        let idx = self.nodes.len();
        for &child in &children {
            self.nodes[child].parents.push(idx);
        }
        self.nodes.push(GraphNode {
            kind,
            children,
            parents: vec![],
            level: AccessibilityLevel::None,
        });
        idx
    }
}

// A formula that reads a cell it never declared would evaluate correctly but
// miss updates (no subscription); one declaring a cell it never reads would
// recompute spuriously. Both are construction-time faults.
fn validate_formulas() -> Result<()> {
    let probes = [GameState::new(Mode::default()), maxed_state()];
    for idx in 0..NUM_FORMULAS {
        let formula = Formula::try_from(idx)?;
        let declared: HashSet<CellKey> = formula.cells().into_iter().collect();
        let mut observed: HashSet<CellKey> = HashSet::new();
        for state in &probes {
            let mut probe = FormulaProbe::default();
            formulas::evaluate(formula, state, Some(&mut probe));
            observed.extend(probe.reads);
        }
        if let Some(cell) = observed.difference(&declared).next() {
            bail!("formula {formula:?} reads undeclared cell {cell:?}");
        }
        if let Some(cell) = declared.difference(&observed).next() {
            bail!("formula {formula:?} declares cell {cell:?} it never reads");
        }
    }
    Ok(())
}

fn maxed_state() -> GameState {
    let mut mode = Mode::default();
    mode.small_key_shuffle = true;
    mode.big_key_shuffle = true;
    mode.generic_keys = true;
    mode.boss_shuffle = true;
    mode.enemy_shuffle = true;
    let mut state = GameState::new(mode);
    for (idx, count) in state.items.iter_mut().enumerate() {
        *count = Item::try_from(idx).unwrap().max_count();
    }
    for (idx, count) in state.prizes.iter_mut().enumerate() {
        *count = Prize::try_from(idx).unwrap().max_count();
    }
    for (idx, count) in state.small_keys.iter_mut().enumerate() {
        *count = Dungeon::try_from(idx).unwrap().small_key_total();
    }
    for count in state.big_keys.iter_mut() {
        *count = 1;
    }
    for trick in state.tricks.iter_mut() {
        *trick = true;
    }
    for level in state.node_levels.iter_mut() {
        *level = AccessibilityLevel::Normal;
    }
    state
}

impl Tracker {
    pub fn new() -> Result<Tracker> {
        Tracker::with_mode(Mode::default())
    }

    pub fn with_mode(mode: Mode) -> Result<Tracker> {
        validate_formulas()?;
        let defs = condition_defs();
        let mut builder = GraphBuilder::new(&defs);
        for idx in 0..NUM_CONDITIONS {
            builder.build_condition(ConditionId::try_from(idx)?)?;
        }
        let GraphBuilder {
            nodes,
            leaf_index,
            root_by_id,
            subscriptions,
            ..
        } = builder;
        let num_leaves = leaf_index.len();
        let mut roots = Vec::with_capacity(NUM_CONDITIONS);
        let mut ids_by_root: HashMap<NodeIdx, Vec<ConditionId>> = HashMap::new();
        for idx in 0..NUM_CONDITIONS {
            let id = ConditionId::try_from(idx)?;
            let root = root_by_id[idx].context("condition not built")?;
            roots.push(root);
            ids_by_root.entry(root).or_default().push(id);
        }
        let mut tracker = Tracker {
            state: GameState::new(mode),
            defs,
            nodes,
            roots,
            ids_by_root,
            subscriptions,
            dirty: BTreeSet::new(),
            batch_depth: 0,
            observers: vec![],
        };
        // Children precede parents, so one ascending pass settles every level.
        for idx in 0..tracker.nodes.len() {
            let level = tracker.compute_level(idx);
            tracker.nodes[idx].level = level;
        }
        info!(
            "condition graph: {} conditions, {} graph nodes, {} interned leaves",
            NUM_CONDITIONS,
            tracker.nodes.len(),
            num_leaves
        );
        Ok(tracker)
    }

    /// Current level, O(1) from the cache.
    pub fn level(&self, id: ConditionId) -> AccessibilityLevel {
        self.nodes[self.roots[id as usize]].level
    }

    /// String-keyed lookup surface for the tracker shell. Unknown names fail
    /// fast instead of reading as an unsatisfiable condition.
    pub fn level_by_name(&self, name: &str) -> Result<AccessibilityLevel> {
        let id = ConditionId::from_str(name).with_context(|| format!("unknown condition '{name}'"))?;
        Ok(self.level(id))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.state.mode
    }

    /// Register an observer fired once per externally visible level change,
    /// after the propagation wave that produced it completes.
    pub fn subscribe(&mut self, observer: impl FnMut(ConditionId, AccessibilityLevel) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn set_item(&mut self, item: Item, count: Count) {
        let clamped = count.clamp(0, item.max_count());
        if self.state.items[item as usize] == clamped {
            return;
        }
        self.state.items[item as usize] = clamped;
        self.cell_changed(CellKey::Item(item));
    }

    pub fn collect_item(&mut self, item: Item) {
        self.set_item(item, self.state.item_count(item) + 1);
    }

    pub fn set_prize(&mut self, prize: Prize, count: Count) {
        let clamped = count.clamp(0, prize.max_count());
        if self.state.prizes[prize as usize] == clamped {
            return;
        }
        self.state.prizes[prize as usize] = clamped;
        self.cell_changed(CellKey::Prize(prize));
    }

    pub fn set_small_keys(&mut self, dungeon: Dungeon, count: Count) {
        let clamped = count.clamp(0, dungeon.small_key_total());
        if self.state.small_keys[dungeon as usize] == clamped {
            return;
        }
        self.state.small_keys[dungeon as usize] = clamped;
        self.cell_changed(CellKey::SmallKeys(dungeon));
    }

    pub fn set_big_key(&mut self, dungeon: Dungeon, held: bool) {
        if !dungeon.has_big_key() {
            return;
        }
        let count = if held { 1 } else { 0 };
        if self.state.big_keys[dungeon as usize] == count {
            return;
        }
        self.state.big_keys[dungeon as usize] = count;
        self.cell_changed(CellKey::BigKey(dungeon));
    }

    pub fn set_trick(&mut self, trick: Trick, enabled: bool) {
        if self.state.tricks[trick as usize] == enabled {
            return;
        }
        self.state.tricks[trick as usize] = enabled;
        self.cell_changed(CellKey::Trick(trick));
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        self.cell_changed(CellKey::Mode);
    }

    pub fn set_node_level(&mut self, node: Node, level: AccessibilityLevel) {
        if self.state.node_levels[node as usize] == level {
            return;
        }
        self.state.node_levels[node as usize] = level;
        self.cell_changed(CellKey::Node(node));
    }

    /// Defer propagation until the matching `end_batch`, so a burst of
    /// mutations (e.g. restoring a saved game) produces one wave and at most
    /// one notification per condition.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            warn!("end_batch without matching begin_batch");
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.propagate();
        }
    }

    pub fn batch<F: FnOnce(&mut Tracker)>(&mut self, f: F) {
        self.begin_batch();
        f(self);
        self.end_batch();
    }

    /// Conditions whose cached level disagrees with a from-scratch
    /// re-evaluation. Always empty in correct operation.
    pub fn check_consistency(&self) -> Vec<ConditionId> {
        let mut drifted = vec![];
        for idx in 0..NUM_CONDITIONS {
            let id = ConditionId::try_from(idx).unwrap();
            let fresh = evaluate(&self.defs[idx], &self.state, &self.defs);
            if fresh != self.level(id) {
                drifted.push(id);
            }
        }
        drifted
    }

    fn cell_changed(&mut self, cell: CellKey) {
        if let Some(subscribers) = self.subscriptions.get(&cell) {
            self.dirty.extend(subscribers.iter().copied());
        }
        if self.batch_depth == 0 {
            self.propagate();
        }
    }

    fn compute_level(&self, idx: NodeIdx) -> AccessibilityLevel {
        let node = &self.nodes[idx];
        match &node.kind {
            GraphKind::Leaf(def) => evaluate(def, &self.state, &self.defs),
            GraphKind::AllOf => {
                AccessibilityLevel::meet_all(node.children.iter().map(|&c| self.nodes[c].level))
            }
            GraphKind::AnyOf => {
                AccessibilityLevel::join_all(node.children.iter().map(|&c| self.nodes[c].level))
            }
            GraphKind::CapAt(max) => self.nodes[node.children[0]].level.meet(*max),
        }
    }

    // Processing the dirty set in ascending index order recomputes each node
    // at most once per wave, after all of its children have settled.
    fn propagate(&mut self) {
        let mut changed: Vec<(ConditionId, AccessibilityLevel)> = vec![];
        while let Some(idx) = self.dirty.pop_first() {
            let new_level = self.compute_level(idx);
            if new_level == self.nodes[idx].level {
                continue;
            }
            self.nodes[idx].level = new_level;
            self.dirty.extend(self.nodes[idx].parents.iter().copied());
            if let Some(ids) = self.ids_by_root.get(&idx) {
                for &id in ids {
                    changed.push((id, new_level));
                }
            }
        }
        if changed.is_empty() {
            return;
        }
        debug!("propagation wave: {} condition level change(s)", changed.len());
        for &(id, level) in &changed {
            for observer in &mut self.observers {
                observer(id, level);
            }
        }
    }
}
