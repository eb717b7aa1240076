use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use questtrack::Tracker;
use questtrack_game::{
    AccessibilityLevel, Count, Dungeon, EntranceShuffle, Item, ItemPlacement, Mode, Node, Prize,
    Trick, WorldState,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ScenariosList {
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    name: String,
    #[serde(default)]
    mode: ScenarioMode,
    #[serde(default)]
    items: HashMap<String, Count>,
    #[serde(default)]
    prizes: HashMap<String, Count>,
    #[serde(default)]
    small_keys: HashMap<String, Count>,
    #[serde(default)]
    big_keys: Vec<String>,
    #[serde(default)]
    tricks: Vec<String>,
    #[serde(default)]
    nodes: HashMap<String, AccessibilityLevel>,
    expect: HashMap<String, AccessibilityLevel>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioMode {
    item_placement: Option<ItemPlacement>,
    world_state: Option<WorldState>,
    entrance_shuffle: Option<EntranceShuffle>,
    small_key_shuffle: Option<bool>,
    big_key_shuffle: Option<bool>,
    generic_keys: Option<bool>,
    boss_shuffle: Option<bool>,
    enemy_shuffle: Option<bool>,
    guaranteed_boss_items: Option<bool>,
    take_any_locations: Option<bool>,
}

fn get_mode(scenario: &ScenarioMode) -> Mode {
    let mut mode = Mode::default();
    if let Some(value) = scenario.item_placement {
        mode.item_placement = value;
    }
    if let Some(value) = scenario.world_state {
        mode.world_state = value;
    }
    if let Some(value) = scenario.entrance_shuffle {
        mode.entrance_shuffle = value;
    }
    if let Some(value) = scenario.small_key_shuffle {
        mode.small_key_shuffle = value;
    }
    if let Some(value) = scenario.big_key_shuffle {
        mode.big_key_shuffle = value;
    }
    if let Some(value) = scenario.generic_keys {
        mode.generic_keys = value;
    }
    if let Some(value) = scenario.boss_shuffle {
        mode.boss_shuffle = value;
    }
    if let Some(value) = scenario.enemy_shuffle {
        mode.enemy_shuffle = value;
    }
    if let Some(value) = scenario.guaranteed_boss_items {
        mode.guaranteed_boss_items = value;
    }
    if let Some(value) = scenario.take_any_locations {
        mode.take_any_locations = value;
    }
    mode
}

fn apply_scenario(tracker: &mut Tracker, scenario: &Scenario, batched: bool) -> Result<()> {
    let mut mutations: Vec<Box<dyn Fn(&mut Tracker)>> = vec![];
    for (name, &count) in &scenario.items {
        let item = Item::from_str(name).with_context(|| format!("unknown item '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_item(item, count)));
    }
    for (name, &count) in &scenario.prizes {
        let prize = Prize::from_str(name).with_context(|| format!("unknown prize '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_prize(prize, count)));
    }
    for (name, &count) in &scenario.small_keys {
        let dungeon =
            Dungeon::from_str(name).with_context(|| format!("unknown dungeon '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_small_keys(dungeon, count)));
    }
    for name in &scenario.big_keys {
        let dungeon =
            Dungeon::from_str(name).with_context(|| format!("unknown dungeon '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_big_key(dungeon, true)));
    }
    for name in &scenario.tricks {
        let trick = Trick::from_str(name).with_context(|| format!("unknown trick '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_trick(trick, true)));
    }
    for (name, &level) in &scenario.nodes {
        let node = Node::from_str(name).with_context(|| format!("unknown node '{name}'"))?;
        mutations.push(Box::new(move |t| t.set_node_level(node, level)));
    }
    if batched {
        tracker.batch(|t| {
            for mutation in &mutations {
                mutation(t);
            }
        });
    } else {
        for mutation in &mutations {
            mutation(tracker);
        }
    }
    Ok(())
}

fn test_scenario(scenario: &Scenario) -> Result<()> {
    // Run each scenario both as one batch and as one-at-a-time mutations;
    // the incremental cascade must land on the same levels either way.
    for batched in [true, false] {
        let mut tracker = Tracker::with_mode(get_mode(&scenario.mode))?;
        apply_scenario(&mut tracker, scenario, batched)?;
        for (name, &expected) in &scenario.expect {
            let actual = tracker.level_by_name(name)?;
            if actual != expected {
                bail!(
                    "scenario '{}' (batched: {}): condition {} is {:?}, expected {:?}",
                    scenario.name,
                    batched,
                    name,
                    actual,
                    expected
                );
            }
        }
        let drifted = tracker.check_consistency();
        if !drifted.is_empty() {
            bail!(
                "scenario '{}' (batched: {}): cached levels drifted for {:?}",
                scenario.name,
                batched,
                drifted
            );
        }
    }
    Ok(())
}

#[test]
fn test_logic_scenarios() -> Result<()> {
    let scenarios_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/scenarios");
    for entry in std::fs::read_dir(&scenarios_dir)? {
        let entry = entry?;
        println!("{}", entry.file_name().to_string_lossy());
        let scenarios_str = std::fs::read_to_string(entry.path())
            .with_context(|| format!("loading {}", entry.path().display()))?;
        let scenarios_list: ScenariosList = serde_json::from_str(&scenarios_str)
            .with_context(|| format!("parsing {}", entry.path().display()))?;
        for scenario in &scenarios_list.scenarios {
            println!("Scenario: {}", scenario.name);
            test_scenario(scenario)?;
        }
    }
    Ok(())
}
