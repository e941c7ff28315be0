//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly `dt`:
//! input → moving platforms → level clock → kinematics → collisions
//! (platforms, coins, hazards) → goal → fall-out.

use super::collision::{collect_coins, first_hazard_hit, resolve_platforms};
use super::events::{DeathCause, GameEvent};
use super::input::TickInput;
use super::state::GameState;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !state.is_playing() {
        return;
    }
    let Some(level) = state.level.as_mut() else {
        log::warn!("Tick while playing without a level");
        return;
    };

    state.time_ticks += 1;
    let tuning = &state.tuning;
    let player = &mut state.player;

    // Input: right is applied last so it wins when both are held
    if input.move_left {
        player.move_left(tuning);
    }
    if input.move_right {
        player.move_right(tuning);
    }
    if input.jump_pressed && player.jump(tuning) {
        state.events.push(GameEvent::Jumped);
    }
    if input.jump_released {
        player.release_jump(tuning);
    }

    level.advance_platforms();
    state.level_time += dt;

    player.integrate(tuning, dt);

    let contacts = resolve_platforms(player, &level.platforms, tuning.collision_padding);
    if !contacts.is_empty() {
        log::trace!("Tick {}: contacts {:?}", state.time_ticks, contacts);
    }
    let coins = collect_coins(player, &mut level.coins);
    let hazard_hit = first_hazard_hit(player, &level.hazards).is_some();

    for coin in coins {
        state.collect_coin(coin.value);
    }
    if hazard_hit {
        state.lose_life(DeathCause::Hazard);
        if !state.is_playing() {
            return;
        }
    }

    let goal_reached = state
        .level
        .as_ref()
        .is_some_and(|level| level.goal.is_reached_by(state.player.pos));
    if goal_reached {
        state.complete_level();
        return;
    }

    if state.player.pos.y > state.tuning.world_height {
        state.lose_life(DeathCause::FellOut);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::level::{Coin, Goal, Hazard, Level, LevelLibrary, LevelProvider, MotionAxis, Platform};
    use crate::sim::player::MovementState;
    use crate::sim::rect::Rect;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    /// A flat 800-wide floor at y=500 with the goal far away
    fn flat_level() -> Level {
        Level {
            name: "Flat".to_string(),
            platforms: vec![Platform::new(0.0, 500.0, 800.0, 100.0, "#4CAF50")],
            coins: Vec::new(),
            hazards: Vec::new(),
            goal: Goal {
                rect: Rect::new(5000.0, 0.0, 50.0, 100.0),
                color: String::new(),
            },
            player_start: Vec2::new(100.0, 450.0),
            background: String::new(),
        }
    }

    fn start(levels: Vec<Level>) -> (GameState, LevelLibrary) {
        let library = LevelLibrary::new(levels);
        let mut state = GameState::new(Tuning::default());
        state.start_game(&library).unwrap();
        (state, library)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Hands out levels exactly as given, without any repair
    struct RawLevels(Vec<Level>);

    impl LevelProvider for RawLevels {
        fn level_count(&self) -> usize {
            self.0.len()
        }

        fn level(&self, index: usize) -> Option<Level> {
            self.0.get(index).cloned()
        }
    }

    #[test]
    fn test_lands_on_first_tick() {
        let (mut state, _) = start(vec![flat_level()]);
        tick(&mut state, &idle(), SIM_DT);
        assert!(state.player.grounded);
        assert_eq!(state.player.vel.y, 0.0);
        assert_eq!(state.player.pos.y, 449.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_no_tick_outside_play() {
        let (mut state, _) = start(vec![flat_level()]);
        state.pause();
        let before = state.player.clone();
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.player, before);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.level_time, 0.0);
    }

    #[test]
    fn test_jump_emits_event_and_rises() {
        let (mut state, _) = start(vec![flat_level()]);
        tick(&mut state, &idle(), SIM_DT);
        let jump = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        assert!(state.player.vel.y < 0.0);
        assert_eq!(state.movement_state(), MovementState::Jumping);

        // Holding jump mid-air does nothing more
        tick(&mut state, &jump, SIM_DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_short_hop_is_lower_than_full_jump() {
        fn apex(release_after: Option<usize>) -> f32 {
            let (mut state, _) = start(vec![flat_level()]);
            tick(&mut state, &idle(), SIM_DT);
            let mut highest = state.player.pos.y;
            for i in 0..120 {
                let input = TickInput {
                    jump_pressed: i == 0 || release_after.is_none_or(|n| i < n),
                    jump_released: release_after == Some(i),
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT);
                highest = highest.min(state.player.pos.y);
            }
            highest
        }
        let full = apex(None);
        let short = apex(Some(3));
        assert!(short > full + 50.0, "short={short} full={full}");
    }

    #[test]
    fn test_runs_right_when_both_held() {
        let (mut state, _) = start(vec![flat_level()]);
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &both, SIM_DT);
        }
        assert!(state.player.vel.x > 0.0);
        assert!(state.player.pos.x > 100.0);
    }

    #[test]
    fn test_coin_pickup_scores_once() {
        let mut level = flat_level();
        level.player_start = Vec2::new(210.0, 350.0);
        level.platforms.push(Platform::new(150.0, 400.0, 150.0, 20.0, "#8B4513"));
        level.coins.push(Coin::new(220.0, 370.0, 10, "#FFD700"));
        let (mut state, _) = start(vec![level]);

        for _ in 0..30 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert_eq!(state.score, 10);
        assert_eq!(state.level.as_ref().unwrap().coins.len(), 0);
        let coin_events = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
            .count();
        assert_eq!(coin_events, 1);
    }

    #[test]
    fn test_two_hazards_cost_one_life() {
        let mut level = flat_level();
        level.hazards.push(Hazard::new(90.0, 480.0, 30.0, 20.0));
        level.hazards.push(Hazard::new(110.0, 480.0, 30.0, 20.0));
        let (mut state, _) = start(vec![level]);
        state.player.pos = Vec2::new(100.0, 440.0);

        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.lives, 9);
        let deaths = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_fall_out_costs_life_and_respawns() {
        let mut level = flat_level();
        level.platforms.clear();
        let (mut state, _) = start(vec![level]);
        state.player.pos.y = 599.9;
        state.player.vel.y = 300.0;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.lives, 9);
        assert_eq!(state.player.pos, Vec2::new(100.0, 450.0));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LifeLost {
                cause: DeathCause::FellOut,
                lives_left: 9
            }]
        );
    }

    #[test]
    fn test_hazard_on_last_life_stops_tick() {
        let mut level = flat_level();
        level.platforms.clear();
        level.hazards.push(Hazard::new(0.0, 590.0, 800.0, 40.0));
        let (mut state, _) = start(vec![level]);
        state.lives = 1;
        state.player.pos.y = 580.0;
        state.player.vel.y = 2000.0;
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        // The fall-out check did not fire a second time
        let deaths = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_reaching_goal_completes_level() {
        let mut level = flat_level();
        level.goal = Goal {
            rect: Rect::new(300.0, 400.0, 50.0, 100.0),
            color: String::new(),
        };
        level.player_start = Vec2::new(299.0, 449.0);
        let (mut state, _) = start(vec![level.clone(), level]);
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &right, SIM_DT);
            if !state.is_playing() {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(state.events.contains(&GameEvent::LevelComplete { index: 0 }));
    }

    #[test]
    fn test_goal_on_last_level_completes_game() {
        let mut level = flat_level();
        level.goal.rect = Rect::new(100.0, 400.0, 50.0, 100.0);
        let (mut state, _) = start(vec![level]);
        tick(&mut state, &idle(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameCompleted);
        assert_eq!(state.drain_events(), vec![GameEvent::GameCompleted]);
    }

    #[test]
    fn test_level_time_and_platforms_advance() {
        let mut level = flat_level();
        level
            .platforms
            .push(Platform::new(200.0, 300.0, 80.0, 20.0, "#8B4513").with_motion(MotionAxis::X, 200.0, 350.0, 1.0));
        let (mut state, _) = start(vec![level]);
        for _ in 0..60 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!((state.level_time - 1.0).abs() < 1e-3);
        assert_eq!(state.level.as_ref().unwrap().platforms[1].rect.x, 260.0);
    }

    #[test]
    fn test_builtin_level_one_is_stable_at_rest() {
        let library = LevelLibrary::builtin();
        let mut state = GameState::new(Tuning::default());
        state.start_game(&library).unwrap();
        for _ in 0..600 {
            tick(&mut state, &idle(), SIM_DT);
        }
        assert!(state.is_playing());
        assert_eq!(state.lives, 10);
        assert!(state.player.pos.y < 500.0 && state.player.pos.y > 440.0);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(move_left, move_right, jump_pressed, jump_released)| TickInput {
                move_left,
                move_right,
                jump_pressed,
                jump_released,
            },
        )
    }

    #[test]
    fn test_malformed_motion_from_any_provider_stays_in_range() {
        let mut level = flat_level();
        level.platforms.extend([
            Platform::new(200.0, 100.0, 80.0, 20.0, "#8B4513").with_motion(MotionAxis::X, 200.0, 350.0, -1.0),
            Platform::new(100.0, 100.0, 80.0, 20.0, "#8B4513").with_motion(MotionAxis::X, 100.0, 50.0, 2.0),
            Platform::new(0.0, 100.0, 80.0, 20.0, "#8B4513").with_motion(MotionAxis::X, 200.0, 350.0, 3.0),
        ]);
        let provider = RawLevels(vec![level]);
        let mut state = GameState::new(Tuning::default());
        state.start_game(&provider).unwrap();

        let loaded = state.level.as_ref().unwrap();
        assert_eq!(loaded.platforms[1].motion.as_ref().unwrap().speed, 1.0);
        assert_eq!(loaded.platforms[2].motion.as_ref().unwrap().range_end, 100.0);
        assert_eq!(loaded.platforms[3].rect.x, 200.0);

        for _ in 0..300 {
            tick(&mut state, &idle(), SIM_DT);
            let platforms = &state.level.as_ref().unwrap().platforms;
            assert!((200.0..=350.0).contains(&platforms[1].rect.x));
            assert_eq!(platforms[2].rect.x, 100.0);
            assert!((200.0..=350.0).contains(&platforms[3].rect.x));
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    proptest! {
        #[test]
        fn prop_identical_inputs_are_bit_identical(inputs in prop::collection::vec(arb_input(), 0..400)) {
            let library = LevelLibrary::builtin();
            let mut a = GameState::new(Tuning::default());
            let mut b = GameState::new(Tuning::default());
            a.start_game(&library).unwrap();
            b.start_game(&library).unwrap();
            for input in &inputs {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
            prop_assert_eq!(a.player.pos.x.to_bits(), b.player.pos.x.to_bits());
            prop_assert_eq!(a.player.pos.y.to_bits(), b.player.pos.y.to_bits());
            prop_assert_eq!(a.player.vel.x.to_bits(), b.player.vel.x.to_bits());
            prop_assert_eq!(a.player.vel.y.to_bits(), b.player.vel.y.to_bits());
            prop_assert_eq!(a.movement_state(), b.movement_state());
            prop_assert_eq!(a.score, b.score);
            prop_assert_eq!(a.lives, b.lives);
            prop_assert_eq!(a.phase, b.phase);
        }

        #[test]
        fn prop_score_never_decreases(inputs in prop::collection::vec(arb_input(), 0..400)) {
            let library = LevelLibrary::builtin();
            let mut state = GameState::new(Tuning::default());
            state.start_game(&library).unwrap();
            let mut last = 0;
            for input in &inputs {
                tick(&mut state, input, SIM_DT);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
