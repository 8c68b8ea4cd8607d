use activities::{Sequence, Wait};
use activity::{ActivityNode, ActorId};
use sim::{Scenario, SimConfig, World};

const DEMO: &str = include_str!("../scenarios/demo.ron");

/// Three actors with nested work; `cancel_at` cancels actor 2 with cascade.
fn scripted_run(cancel_at: u64) -> String {
    let mut world = World::new(SimConfig::default());
    for _ in 0..3 {
        let id = world.spawn(());
        let chain = Sequence::of(vec![
            ActivityNode::new(Wait::new(3)),
            ActivityNode::new(Wait::new(2)),
            ActivityNode::new(Wait::uninterruptible(4)),
        ]);
        world.enqueue(id, chain, false).unwrap();
        world
            .enqueue(id, ActivityNode::new(Wait::new(id.0 * 2)), false)
            .unwrap();
    }

    while !world.is_idle() {
        if world.now().0 == cancel_at {
            world.cancel_active(ActorId(2), true).unwrap();
        }
        world.step();
    }
    world.journal().digest_hex()
}

#[test]
fn identical_inputs_give_identical_digests() {
    assert_eq!(scripted_run(4), scripted_run(4));
}

#[test]
fn cancel_timing_changes_the_digest() {
    assert_ne!(scripted_run(2), scripted_run(5));
}

#[test]
fn demo_scenario_replays_bit_for_bit() {
    let scenario = Scenario::from_ron_str(DEMO).unwrap();
    let first = scenario.run(SimConfig::default()).unwrap();
    let second = scenario.run(SimConfig::default()).unwrap();

    assert_eq!(first, second);
    assert!(first.faults.is_empty());
    assert_eq!(first.digest.len(), 64);
}

#[test]
fn journal_capacity_does_not_affect_digest() {
    let scenario = Scenario::from_ron_str(DEMO).unwrap();
    let bounded = SimConfig {
        journal_capacity: Some(4),
        ..SimConfig::default()
    };
    let unbounded = SimConfig {
        journal_capacity: None,
        ..SimConfig::default()
    };
    assert_eq!(
        scenario.run(bounded).unwrap().digest,
        scenario.run(unbounded).unwrap().digest
    );
}
