//! Per-frame simulation tick
//!
//! Input is resolved into velocities once per frame, then physics runs in
//! fixed `SIM_DT` steps with contact handlers after each one. Nothing runs
//! after the player is hit, including the rest of that frame's steps.

use glam::Vec2;
use rand::Rng;

use super::input::Intent;
use super::state::{Anim, BOMBS, Bomb, EntityRef, GameEvent, score_label};
use super::world::Simulation;
use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, PhysicsProvider};

/// Advance one rendered frame; returns what happened during it
pub fn tick<P: PhysicsProvider>(sim: &mut Simulation<P>, dt: f32) -> Vec<GameEvent> {
    if sim.state.over {
        return Vec::new();
    }
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    sim.time_ticks += 1;

    let intent = sim.input.intent();
    let player = sim.state.player.body;

    let (vx, anim) = horizontal_motion(&intent, sim.tuning.player_speed);
    sim.physics.set_velocity_x(player, vx);
    sim.state.player.play(anim);

    // Ground contact is from the previous step
    if intent.jump && sim.physics.touching_down(player) {
        sim.physics.set_velocity_y(player, sim.tuning.jump_velocity);
        sim.input.consume_jump();
    }

    sim.accumulator += dt;
    let mut substeps = 0;
    while sim.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
        let contacts = sim.physics.step(SIM_DT);
        sim.accumulator -= SIM_DT;
        substeps += 1;
        sim.state.player.advance_anim(SIM_DT);
        sim.dispatch(&contacts);
        if sim.state.over {
            break;
        }
    }
    if substeps == MAX_SUBSTEPS {
        sim.accumulator = sim.accumulator.min(SIM_DT);
    }
    sim.state.sync_from(&sim.physics);

    std::mem::take(&mut sim.events)
}

/// Horizontal velocity and animation for an intent; left wins ties
pub fn horizontal_motion(intent: &Intent, speed: f32) -> (f32, Anim) {
    if intent.move_left {
        (-speed, Anim::Left)
    } else if intent.move_right {
        (speed, Anim::Right)
    } else {
        (0.0, Anim::Turn)
    }
}

/// Bomb x on the opposite half of the play area from the player
pub fn bomb_spawn_x<R: Rng>(player_x: f32, play_width: f32, rng: &mut R) -> f32 {
    let mid = play_width * 0.5;
    if player_x < mid {
        rng.random_range(mid..play_width)
    } else {
        rng.random_range(0.0..mid)
    }
}

/// Player touched a star
pub fn collect_star<P: PhysicsProvider>(sim: &mut Simulation<P>, player: BodyHandle, star: BodyHandle) {
    if sim.state.over {
        return;
    }
    let entity = sim.state.entity(star);
    debug_assert!(
        matches!(entity, Some(EntityRef::Star(_))),
        "star overlap with unknown body {:?}",
        star
    );
    debug_assert_eq!(sim.state.entity(player), Some(EntityRef::Player));
    let Some(EntityRef::Star(index)) = entity else {
        return;
    };
    if !sim.state.stars[index].active {
        return;
    }

    sim.physics.disable_body(star);
    sim.state.stars[index].active = false;
    sim.state.score += sim.tuning.score_per_star;
    sim.state.score_text = score_label(sim.state.score);
    sim.events.push(GameEvent::StarCollected {
        star: index,
        score: sim.state.score,
        text: sim.state.score_text.clone(),
    });

    if sim.state.active_stars() == 0 {
        refill_stars(sim);
        spawn_bomb(sim);
    }
}

/// Player touched a bomb: freeze everything and end the run
pub fn hit_bomb<P: PhysicsProvider>(sim: &mut Simulation<P>, player: BodyHandle, bomb: BodyHandle) {
    if sim.state.over {
        return;
    }
    let valid = sim.state.entity(player) == Some(EntityRef::Player)
        && matches!(sim.state.entity(bomb), Some(EntityRef::Bomb(_)));
    debug_assert!(valid, "bomb collision between {:?} and {:?}", player, bomb);
    if !valid {
        return;
    }

    sim.physics.pause();
    sim.state.player.tint = Some(DEFEAT_TINT);
    sim.state.over = true;
    sim.events.push(GameEvent::PlayerHit {
        final_score: sim.state.score,
    });
}

/// Bring every star back to the top of its column with a new bounce
fn refill_stars<P: PhysicsProvider>(sim: &mut Simulation<P>) {
    let (min, max) = (sim.tuning.star_bounce_min, sim.tuning.star_bounce_max);
    for star in &mut sim.state.stars {
        let bounce_y = sim.rng.random_range(min..max);
        sim.physics.enable_body(star.body, Vec2::new(star.slot_x, 0.0));
        sim.physics.set_bounce(star.body, Vec2::new(0.0, bounce_y));
        star.bounce_y = bounce_y;
        star.active = true;
    }
    log::debug!("Stars refilled ({})", sim.state.stars.len());
    sim.events.push(GameEvent::StarsRefilled);
}

fn spawn_bomb<P: PhysicsProvider>(sim: &mut Simulation<P>) {
    let player_x = sim
        .physics
        .position(sim.state.player.body)
        .map_or(sim.state.player.pos.x, |p| p.x);
    let x = bomb_spawn_x(player_x, sim.world.width(), &mut sim.rng);
    let max_vx = sim.tuning.bomb_max_speed_x;
    let vx = sim.rng.random_range(-max_vx..=max_vx);
    let pos = Vec2::new(x, BOMB_SPAWN_Y);
    let vel = Vec2::new(vx, sim.tuning.bomb_fall_speed);

    let body = sim.physics.create_body(BodyDesc::dynamic(
        BOMBS,
        pos,
        Vec2::new(BOMB_SIZE.0, BOMB_SIZE.1),
    ));
    sim.physics.set_bounce(body, Vec2::ONE);
    sim.physics.set_collide_world_bounds(body, true);
    sim.physics.set_velocity(body, vel);
    sim.state.bombs.push(Bomb { body, pos, vel });

    log::debug!(
        "Bomb #{} spawned at x={:.0} vx={:.0} (player x={:.0})",
        sim.state.bombs.len(),
        x,
        vx,
        player_x
    );
    sim.events.push(GameEvent::BombSpawned { x, vx });
}
