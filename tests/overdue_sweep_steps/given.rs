//! Given steps for overdue sweep BDD scenarios.

use super::world::{OverdueSweepWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use mockable::Clock;
use rstest_bdd_macros::given;
use taskhub::task::{
    domain::TaskStatus,
    services::{OverdueSweepSettings, TaskInput},
};

#[given(r#"a "{status_name}" task due in {minutes:u64} minutes"#)]
fn task_due_in(
    world: &mut OverdueSweepWorld,
    status_name: String,
    minutes: u64,
) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(status_name.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let offset = i64::try_from(minutes).wrap_err("minutes out of range")?;
    let due = world.clock.utc() + Duration::minutes(offset);
    let input = TaskInput::new(format!("{status} chore"), status).with_due_date(due);

    let created = run_async(world.service.create(input)).wrap_err("create scenario task")?;
    world.last_task = Some(created);
    Ok(())
}

#[given("the clock advances by {minutes:u64} minutes")]
fn clock_advances(world: &mut OverdueSweepWorld, minutes: u64) -> Result<(), eyre::Report> {
    let offset = i64::try_from(minutes).wrap_err("minutes out of range")?;
    world.clock.advance(Duration::minutes(offset));
    Ok(())
}

#[given("the overdue sweep is disabled")]
fn sweep_disabled(world: &mut OverdueSweepWorld) {
    world.settings = OverdueSweepSettings::disabled();
}
