use activities::{CallFunc, Wait};
use activity::{Activity, ActivityError, ActivityNode, Scope, Status};
use sim::{SimConfig, SimError, World};

#[derive(Default)]
struct Counter {
    ticks: u32,
    disposed: bool,
}

/// Fails on its `at`-th tick.
struct Faulty {
    at: u32,
    ticked: u32,
}

impl Activity<Counter> for Faulty {
    fn tick(&mut self, scope: &mut Scope<'_, Counter>) -> Result<Status, ActivityError> {
        self.ticked += 1;
        scope.ctx_mut().ticks += 1;
        if self.ticked == self.at {
            return Err(ActivityError::faulted("Faulty", "scripted failure"));
        }
        Ok(Status::Running)
    }
}

/// Counts its ticks and flags disposal.
struct Busy;

impl Activity<Counter> for Busy {
    fn tick(&mut self, scope: &mut Scope<'_, Counter>) -> Result<Status, ActivityError> {
        scope.ctx_mut().ticks += 1;
        Ok(Status::Running)
    }

    fn on_actor_dispose(&mut self, ctx: &mut Counter) {
        ctx.disposed = true;
    }
}

#[test]
fn fault_is_contained_to_one_actor() {
    let mut world = World::new(SimConfig::default());
    let broken = world.spawn(Counter::default());
    let healthy = world.spawn(Counter::default());
    world
        .enqueue(broken, ActivityNode::new(Faulty { at: 2, ticked: 0 }), false)
        .unwrap();
    world
        .enqueue(broken, ActivityNode::new(Wait::new(1)), false)
        .unwrap();
    world
        .enqueue(healthy, ActivityNode::new(Wait::new(5)), false)
        .unwrap();

    let reports = world.run(5);
    assert_eq!(reports[1].faults.len(), 1);
    assert_eq!(reports[1].faults[0].actor, broken);
    assert_eq!(reports[1].faults[0].error.error_code(), "faulted");

    // The broken actor's next activity still runs.
    assert_eq!(reports[2].completions[0].actor, broken);
    assert_eq!(reports[4].completions[0].actor, healthy);
    assert!(world.is_idle());
}

#[test]
fn despawn_notifies_live_activities() {
    let mut world = World::new(SimConfig::default());
    let id = world.spawn(Counter::default());
    world.enqueue(id, ActivityNode::new(Busy), false).unwrap();
    world.run(3);

    let state = world.despawn(id).unwrap();
    assert_eq!(state.ticks, 3);
    assert!(state.disposed);
    assert!(world.is_empty());
    assert!(matches!(world.despawn(id), Err(SimError::UnknownActor(_))));
}

#[test]
fn orders_for_unknown_actors_are_rejected() {
    let mut world: World<Counter> = World::new(SimConfig::default());
    let node = ActivityNode::new(CallFunc::new(|c: &mut Counter| c.ticks += 1));
    let error = world
        .enqueue(activity::ActorId(9), node, false)
        .unwrap_err();
    assert!(matches!(error, SimError::UnknownActor(activity::ActorId(9))));
}

#[test]
fn endless_work_does_not_settle() {
    let config = SimConfig {
        settle_limit: 10,
        ..SimConfig::default()
    };
    let mut world = World::new(config);
    let id = world.spawn(Counter::default());
    world.enqueue(id, ActivityNode::new(Busy), false).unwrap();

    let error = world.run_until_idle().unwrap_err();
    assert!(matches!(error, SimError::Unsettled { limit: 10 }));
    assert_eq!(world.now().0, 10);
}
