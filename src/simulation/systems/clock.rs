use bevy_ecs::prelude::*;
use tracing::debug;

use crate::simulation::{MatchClock, RulesConfig};

/// Advances the frame counter after every other system has run.
pub fn clock_system(rules: Res<RulesConfig>, mut clock: ResMut<MatchClock>) {
    advance(&mut clock, &rules);
}

pub fn advance(clock: &mut MatchClock, rules: &RulesConfig) {
    clock.elapsed += 1;
    clock.counter += 1;
    if clock.counter > rules.counter_wrap {
        clock.counter = 0;
    }
    if !clock.armed && rules.arm_interval != 0 && clock.counter % rules.arm_interval == 0 {
        clock.armed = true;
        debug!("Board input armed after {} ticks", clock.elapsed);
    }
}
