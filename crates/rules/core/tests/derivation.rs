//! End-to-end resolution behavior over a `Session`.

use proptest::prelude::*;
use rules_core::{AttrId, ResolveError, RuleError, Ruleset, Session, Value};

fn attr(name: &str) -> AttrId {
    AttrId::parse(name).unwrap()
}

fn resolve(session: &mut Session, name: &str) -> Option<Value> {
    session.resolve(&attr(name)).unwrap()
}

fn define(session: &mut Session, target: &str, source: &str, op: &str, operand: &str) {
    session
        .ruleset_mut()
        .define_rule(target, source, op, operand)
        .unwrap();
}

// ============================================================================
// Operator folding
// ============================================================================

proptest! {
    #[test]
    fn first_writer_wins(operands in prop::collection::vec(-100i64..100, 1..10)) {
        let mut session = Session::default();
        session.set_fact("level", 1).unwrap();
        for operand in &operands {
            define(&mut session, "armorClass", "level", "=", &operand.to_string());
        }
        prop_assert_eq!(resolve(&mut session, "armorClass"), Some(Value::Int(operands[0])));
    }

    #[test]
    fn accumulate_is_order_independent(
        bonuses in prop::collection::vec(-20i64..20, 1..8),
        rotation in 0usize..8,
    ) {
        let mut order: Vec<usize> = (0..bonuses.len()).collect();
        order.rotate_left(rotation % bonuses.len());

        let build = |order: &[usize]| {
            let mut session = Session::default();
            for (i, bonus) in bonuses.iter().enumerate() {
                session.set_fact(&format!("bonus.{i}"), *bonus).unwrap();
            }
            for &i in order {
                define(&mut session, "saves.Fortitude", &format!("bonus.{i}"), "+=", "source");
            }
            session
        };

        let forward: Vec<usize> = (0..bonuses.len()).collect();
        let expected = Some(Value::Int(bonuses.iter().sum()));
        prop_assert_eq!(resolve(&mut build(&forward), "saves.Fortitude"), expected.clone());
        prop_assert_eq!(resolve(&mut build(&order), "saves.Fortitude"), expected);
    }
}

#[test]
fn max_then_add_folds_in_registration_order() {
    let mut session = Session::default();
    session.set_fact("strength", 8).unwrap();
    define(&mut session, "carry", "strength", "=", "source");
    define(&mut session, "carry", "strength", "^", "10");
    define(&mut session, "carry", "strength", "+", "2");
    assert_eq!(resolve(&mut session, "carry"), Some(Value::Int(12)));

    let mut reversed = Session::default();
    reversed.set_fact("strength", 8).unwrap();
    define(&mut reversed, "carry", "strength", "=", "source");
    define(&mut reversed, "carry", "strength", "+", "2");
    define(&mut reversed, "carry", "strength", "^", "10");
    assert_eq!(resolve(&mut reversed, "carry"), Some(Value::Int(10)));
}

#[test]
fn clamp_and_multiply_leave_unset_alone() {
    let mut session = Session::default();
    session.set_fact("level", 3).unwrap();
    define(&mut session, "spellResistance", "level", "*", "2");
    define(&mut session, "spellResistance", "level", "v", "20");
    assert_eq!(resolve(&mut session, "spellResistance"), None);

    define(&mut session, "spellResistance", "level", "v=", "25");
    define(&mut session, "spellResistance", "level", "v", "20");
    assert_eq!(resolve(&mut session, "spellResistance"), Some(Value::Int(20)));
}

// ============================================================================
// Retraction
// ============================================================================

#[test]
fn delete_then_redefine_matches_never_registered() {
    let mut retracted = Session::default();
    retracted.set_fact("dexterity", 16).unwrap();
    define(&mut retracted, "armorClass", "dexterity", "=", "10");
    define(&mut retracted, "initiative", "dexterity", "=", "(source - 10) / 2");
    define(&mut retracted, "armorClass", "dexterity", "+", "(source - 10) / 2");
    let before = retracted.resolve_all().unwrap();
    assert_eq!(before.get("armorClass"), Some(&Value::Int(13)));

    let removed = retracted
        .ruleset_mut()
        .delete_rule("armorClass", "dexterity")
        .unwrap();
    assert_eq!(removed, 2);
    define(&mut retracted, "armorClass", "dexterity", "=", "12");

    let mut fresh = Session::default();
    fresh.set_fact("dexterity", 16).unwrap();
    define(&mut fresh, "initiative", "dexterity", "=", "(source - 10) / 2");
    define(&mut fresh, "armorClass", "dexterity", "=", "12");

    assert_eq!(retracted.resolve_all().unwrap(), fresh.resolve_all().unwrap());
}

#[test]
fn deleting_a_missing_edge_is_a_no_op() {
    let mut ruleset = Ruleset::new();
    assert_eq!(ruleset.delete_rule("featureNotes.x", "features.X").unwrap(), 0);
    assert!(matches!(
        ruleset.delete_rule("featureNotes.x", "/(unclosed/"),
        Err(RuleError::Source(_))
    ));
}

// ============================================================================
// Patterns and gates
// ============================================================================

#[test]
fn pattern_picks_up_attributes_created_later() {
    let mut session = Session::default();
    session.set_fact("features.Turn Undead", 1).unwrap();
    define(&mut session, "turnUndead.frequency", "features.Turn Undead", "=", "3");
    define(&mut session, "turnTotal", r"/^turn.*\.frequency$/", "+=", "source");
    assert_eq!(resolve(&mut session, "turnTotal"), Some(Value::Int(3)));

    session.set_fact("features.Turn Lycanthropes", 1).unwrap();
    define(
        &mut session,
        "turnLycanthropes.frequency",
        "features.Turn Lycanthropes",
        "=",
        "2",
    );
    assert_eq!(resolve(&mut session, "turnTotal"), Some(Value::Int(5)));

    session
        .ruleset_mut()
        .delete_rule("turnUndead.frequency", "features.Turn Undead")
        .unwrap();
    assert_eq!(resolve(&mut session, "turnTotal"), Some(Value::Int(2)));
}

#[test]
fn empty_pattern_match_contributes_nothing() {
    let mut session = Session::default();
    session.set_fact("level", 1).unwrap();
    define(&mut session, "skillPoints", "level", "=", "4");
    define(&mut session, "skillPoints", r"/^skillBonus\./", "+", "source");
    assert_eq!(resolve(&mut session, "skillPoints"), Some(Value::Int(4)));
}

#[test]
fn failed_gate_leaks_no_partial_value() {
    let mut session = Session::default();
    session.set_fact("levels.Paladin", 2).unwrap();
    session.set_fact("charismaModifier", 3).unwrap();
    define(&mut session, "saveBonus", "levels.Paladin", "=", "0");
    define(&mut session, "saveBonus", "levels.Paladin", "?", "source >= 2");
    define(&mut session, "saveBonus", "charismaModifier", "+", "source");
    assert_eq!(resolve(&mut session, "saveBonus"), Some(Value::Int(3)));

    session.set_fact("levels.Paladin", 1).unwrap();
    assert_eq!(resolve(&mut session, "saveBonus"), None);
    assert!(!session.resolve_all().unwrap().contains_key("saveBonus"));
}

#[test]
fn gate_with_unset_source_fails() {
    let mut session = Session::default();
    session.set_fact("level", 5).unwrap();
    define(&mut session, "smite", "level", "=", "source");
    define(&mut session, "smite", "features.Smite Evil", "?", "1");
    assert_eq!(resolve(&mut session, "smite"), None);

    session.set_fact("features.Smite Evil", 1).unwrap();
    assert_eq!(resolve(&mut session, "smite"), Some(Value::Int(5)));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn subrace_overrides_darkvision() {
    let mut session = Session::default();
    session.set_fact("race", "Drow").unwrap();

    // Base template.
    define(&mut session, "featureNotes.darkvisionFeature", "features.Darkvision", "=", "60");
    // Parent race.
    define(&mut session, "isRace.Elf", "race", "=", "source == \"Drow\" ? 1 : null");
    define(&mut session, "features.Darkvision", "isRace.Elf", "=", "1");
    // Subrace.
    define(&mut session, "isRace.Drow", "race", "=", "source == \"Drow\" ? 1 : null");
    session
        .ruleset_mut()
        .delete_rule("featureNotes.darkvisionFeature", "features.Darkvision")
        .unwrap();
    define(&mut session, "featureNotes.darkvisionFeature", "isRace.Drow", "=", "120");

    assert_eq!(
        resolve(&mut session, "featureNotes.darkvisionFeature"),
        Some(Value::Int(120))
    );
}

#[test]
fn domain_turning_takes_the_maximum() {
    let mut session = Session::default();
    session.set_fact("domains.Sun", 1).unwrap();
    session.set_fact("domains.Undeath", 1).unwrap();
    session.set_fact("levels.Cleric", 5).unwrap();
    session.set_fact("levels.Blackguard", 3).unwrap();

    define(&mut session, "turningLevel", "domains.Sun", "^=", "{levels.Cleric}");
    define(
        &mut session,
        "turningLevel",
        "domains.Undeath",
        "^=",
        "{levels.Cleric} + {levels.Blackguard}",
    );
    assert_eq!(resolve(&mut session, "turningLevel"), Some(Value::Int(8)));
}

#[test]
fn cycle_names_both_attributes() {
    let mut session = Session::default();
    define(&mut session, "a", "b", "+", "1");
    define(&mut session, "b", "a", "+", "1");

    let expected = ResolveError::Cycle {
        attributes: vec![attr("a"), attr("b")],
    };
    assert_eq!(session.resolve(&attr("a")), Err(expected.clone()));
    assert_eq!(session.resolve(&attr("b")), Err(expected.clone()));
    assert_eq!(session.resolve_all(), Err(expected));
}

#[test]
fn breaking_a_cycle_restores_resolution() {
    let mut session = Session::default();
    session.set_fact("level", 1).unwrap();
    define(&mut session, "a", "b", "+", "1");
    define(&mut session, "b", "a", "+", "1");
    assert!(session.resolve(&attr("a")).is_err());

    session.ruleset_mut().delete_rule("b", "a").unwrap();
    define(&mut session, "b", "level", "=", "4");
    assert_eq!(resolve(&mut session, "b"), Some(Value::Int(4)));
    assert_eq!(resolve(&mut session, "a"), Some(Value::Int(1)));
}

#[test]
fn deep_dependency_chain_resolves() {
    const DEPTH: usize = 10_000;
    let mut session = Session::default();
    session.set_fact("chain.0", 1).unwrap();
    for i in 1..DEPTH {
        define(&mut session, &format!("chain.{i}"), &format!("chain.{}", i - 1), "+", "source");
    }

    let top = format!("chain.{}", DEPTH - 1);
    assert_eq!(resolve(&mut session, &top), Some(Value::Int(1)));

    session.set_fact("chain.0", 7).unwrap();
    assert_eq!(resolve(&mut session, &top), Some(Value::Int(7)));
}

#[test]
fn cycle_at_the_bottom_of_a_deep_chain_is_reported() {
    const DEPTH: usize = 5_000;
    let mut session = Session::default();
    define(&mut session, "chain.0", &format!("chain.{}", DEPTH / 2), "+", "1");
    for i in 1..DEPTH {
        define(&mut session, &format!("chain.{i}"), &format!("chain.{}", i - 1), "+", "source");
    }

    let err = session.resolve(&attr(&format!("chain.{}", DEPTH - 1))).unwrap_err();
    let ResolveError::Cycle { attributes } = err;
    assert_eq!(attributes.len(), DEPTH / 2 + 1);
    assert!(attributes.contains(&attr("chain.0")));
}
