//! Skyhop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use skyhop::consts::{WORLD_HEIGHT, WORLD_WIDTH};
    use skyhop::sim::{GamePhase, LevelLibrary, Rect};
    use skyhop::{Session, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        ctx: CanvasRenderingContext2d,
        scale: f64,
    }

    impl Game {
        /// Run the ticks owed for this frame and forward events
        fn update(&mut self, time: f64) {
            self.session.frame(time);

            for event in self.session.drain_events() {
                log::debug!("{:?} (sound: {})", event, event.sound().as_str());
            }
        }

        fn fill(&self, rect: &Rect, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(
                rect.x as f64 * self.scale,
                rect.y as f64 * self.scale,
                rect.width as f64 * self.scale,
                rect.height as f64 * self.scale,
            );
        }

        /// Flat-rectangle view of the current snapshot
        fn render(&self) {
            let state = &self.session.state;
            let Some(level) = &state.level else {
                return;
            };

            self.ctx.set_fill_style_str(&level.background);
            self.ctx.fill_rect(
                0.0,
                0.0,
                WORLD_WIDTH as f64 * self.scale,
                WORLD_HEIGHT as f64 * self.scale,
            );

            for platform in &level.platforms {
                self.fill(&platform.rect, &platform.color);
            }
            for coin in &level.coins {
                self.fill(&coin.rect, &coin.color);
            }
            for hazard in &level.hazards {
                self.fill(&hazard.rect, &hazard.color);
            }
            self.fill(&level.goal.rect, &level.goal.color);
            self.fill(&state.player.rect(), "#ff6600");

            self.ctx.set_fill_style_str("#000000");
            self.ctx.set_font("20px sans-serif");
            let hud = format!(
                "Score {}   Lives {}   Level {}   {:.1}s",
                state.score,
                state.lives,
                state.level_index + 1,
                state.level_time
            );
            let _ = self.ctx.fill_text(&hud, 12.0, 28.0);

            let banner = match state.phase {
                GamePhase::Paused => Some("Paused - Esc to resume"),
                GamePhase::LevelComplete => Some("Level complete - Enter for next level"),
                GamePhase::GameOver => Some("Game over - Enter to restart"),
                GamePhase::GameCompleted => Some("You win! - Enter to play again"),
                GamePhase::Menu => Some("Press Enter to start"),
                GamePhase::Playing => None,
            };
            if let Some(text) = banner {
                let _ = self.ctx.fill_text(text, 12.0, 60.0);
            }
        }

        /// Enter: start, continue or restart depending on phase
        fn confirm(&mut self) {
            let result = match self.session.state.phase {
                GamePhase::LevelComplete => self.session.next_level(),
                GamePhase::Menu | GamePhase::GameOver | GamePhase::GameCompleted => {
                    self.session.start()
                }
                GamePhase::Playing | GamePhase::Paused => Ok(()),
            };
            if let Err(e) = result {
                log::error!("Could not change level: {}", e);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyhop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width() as f64;
        let client_h = canvas.client_height() as f64;
        canvas.set_width((client_w * dpr) as u32);
        canvas.set_height((client_h * dpr) as u32);
        // Fit the world into the canvas
        let scale = (client_w * dpr / WORLD_WIDTH as f64).min(client_h * dpr / WORLD_HEIGHT as f64);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let game = Rc::new(RefCell::new(Game {
            session: Session::new(LevelLibrary::builtin(), Tuning::default()),
            ctx,
            scale,
        }));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Skyhop running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.session.input.set_left(true),
                    "ArrowRight" | "KeyD" => g.session.input.set_right(true),
                    "ArrowUp" | "KeyW" | "Space" => g.session.input.press_jump(),
                    "Escape" => {
                        g.session.toggle_pause();
                    }
                    "Enter" => g.confirm(),
                    _ => return,
                }
                // Keep arrows and space from scrolling the page
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => g.session.input.set_left(false),
                    "ArrowRight" | "KeyD" => g.session.input.set_right(false),
                    "ArrowUp" | "KeyW" | "Space" => g.session.input.release_jump(),
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.session.input.clear();
                    if g.session.state.is_playing() {
                        g.session.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur: keys released outside the page never send keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.session.input.clear();
                if g.session.state.is_playing() {
                    g.session.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Skyhop (native) starting...");
    log::info!("Native mode runs the levels headless with the autopilot - use `trunk serve` to play");

    let options = headless::Options::from_args(std::env::args().skip(1))?;
    let summary = headless::run(&options)?;
    println!("{summary}");
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use skyhop::sim::{Autopilot, GameEvent, GamePhase, LevelLibrary};
    use skyhop::{Session, SimError, Tuning};

    /// Simulated display refresh: deliberately not a multiple of the tick
    const FRAME_SECONDS: f64 = 1.0 / 144.0;

    pub struct Options {
        pub seed: u64,
        /// Simulated seconds before giving up
        pub max_seconds: f64,
        pub levels_path: Option<String>,
        pub tuning_path: Option<String>,
    }

    impl Options {
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut options = Options {
                seed: 1,
                max_seconds: 300.0,
                levels_path: None,
                tuning_path: None,
            };
            while let Some(arg) = args.next() {
                let mut value = || args.next().ok_or_else(|| format!("{arg} needs a value"));
                match arg.as_str() {
                    "--seed" => options.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
                    "--seconds" => {
                        options.max_seconds = value()?.parse().map_err(|e| format!("--seconds: {e}"))?
                    }
                    "--levels" => options.levels_path = Some(value()?),
                    "--tuning" => options.tuning_path = Some(value()?),
                    other => return Err(format!("unknown argument {other}")),
                }
            }
            Ok(options)
        }
    }

    pub fn run(options: &Options) -> Result<String, Box<dyn std::error::Error>> {
        let levels = match &options.levels_path {
            Some(path) => LevelLibrary::from_json(&std::fs::read_to_string(path)?)?,
            None => LevelLibrary::builtin(),
        };
        let tuning = match &options.tuning_path {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let mut session = Session::new(levels, tuning);
        session.start()?;
        let mut pilot = Autopilot::new(options.seed);
        log::info!("Autopilot seed {}", pilot.seed());

        let mut elapsed = 0.0;
        let (mut jumps, mut coins, mut deaths) = (0u32, 0u32, 0u32);

        while elapsed < options.max_seconds {
            elapsed += FRAME_SECONDS;
            let steps = session.clock.advance(FRAME_SECONDS);
            for _ in 0..steps {
                let input = pilot.next_input(&session.state);
                session.step(&input);
            }

            for event in session.drain_events() {
                log::debug!("t={:.2}s {:?} (sound: {})", elapsed, event, event.sound().as_str());
                match event {
                    GameEvent::Jumped => jumps += 1,
                    GameEvent::CoinCollected { .. } => coins += 1,
                    GameEvent::LifeLost { .. } => deaths += 1,
                    _ => {}
                }
            }

            match session.state.phase {
                GamePhase::LevelComplete => match session.next_level() {
                    Ok(()) => {}
                    Err(SimError::NoNextLevel { .. }) => break,
                    Err(e) => return Err(e.into()),
                },
                GamePhase::GameOver | GamePhase::GameCompleted => break,
                _ => {}
            }
        }

        let state = &session.state;
        Ok(format!(
            "{:?} after {:.1}s: level {}/{}, score {}, lives {}, {} jumps, {} coins, {} deaths",
            state.phase,
            elapsed,
            state.level_index + 1,
            state.level_count,
            state.score,
            state.lives,
            jumps,
            coins,
            deaths
        ))
    }

}
