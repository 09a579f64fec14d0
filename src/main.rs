//! Strike Zone entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay lives in `strike_zone::sim`; this file is DOM/HUD/input glue.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use strike_zone::audio::AudioManager;
    use strike_zone::consts::*;
    use strike_zone::render::{Assets, Renderer};
    use strike_zone::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<Renderer>,
        audio: AudioManager,
        input: TickInput,
        /// False until the start button is pressed
        running: bool,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                audio: AudioManager::new(),
                input: TickInput::default(),
                running: false,
                last_time: 0.0,
            }
        }

        /// Fresh session; keeps renderer, audio, and mute preference
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.input.fire = false;
            self.running = true;
            log::info!("session started with seed {seed}");
        }

        /// Advance the simulation and flush its events to the audio cues
        fn update(&mut self, dt_ms: f32) {
            if !self.running {
                return;
            }
            tick(&mut self.state, &self.input, dt_ms);
            // One-shot inputs are consumed by exactly one tick
            self.input.fire = false;

            for event in self.state.events.drain(..) {
                self.audio.play(&event);
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&self.state);
            }
        }

        /// Push a read-only snapshot into the HUD text nodes
        fn update_hud(&self, document: &Document) {
            let hud = self.state.hud();

            set_text(document, "score-hud", &format!("Score: {}", hud.score));
            set_text(document, "lives-hud", &format!("Lives: {}", hud.lives));
            set_text(document, "wave-hud", &format!("Enemies: {}", hud.enemies));
            let status = if self.state.phase == GamePhase::GameOver {
                "Status: Game Over".to_string()
            } else {
                format!(
                    "Status: Playing | Level: {} | Kills: {}",
                    hud.level.number(),
                    hud.kills
                )
            };
            set_text(document, "status-hud", &status);

            // Game-over overlay with final score and a restart affordance
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    set_text(document, "final-score", &hud.score.to_string());
                    set_text(document, "final-kills", &hud.kills.to_string());
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Strike Zone starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_W as u32);
        canvas.set_height(FIELD_H as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        let assets = Assets::load(&document);
        match Renderer::new(&canvas, assets) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("renderer init failed: {e:?}"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());

        // Paint the idle field behind the start screen
        request_animation_frame(game);

        log::info!("Strike Zone running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Held movement keys; space fires as a one-shot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "a" | "ArrowLeft" => g.input.turn_left = true,
                    "d" | "ArrowRight" => g.input.turn_right = true,
                    "s" | "ArrowDown" => g.input.throttle_up = true,
                    "w" | "ArrowUp" => g.input.throttle_down = true,
                    " " => {
                        event.prevent_default();
                        g.input.fire = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "a" | "ArrowLeft" => g.input.turn_left = false,
                    "d" | "ArrowRight" => g.input.turn_right = false,
                    "s" | "ArrowDown" => g.input.throttle_up = false,
                    "w" | "ArrowUp" => g.input.throttle_down = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer position, scaled into field coordinates
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let scale_x = FIELD_W as f64 / rect.width();
                let scale_y = FIELD_H as f64 / rect.height();
                let x = (event.client_x() as f64 - rect.left()) * scale_x;
                let y = (event.client_y() as f64 - rect.top()) * scale_y;
                game.borrow_mut().input.pointer = Some(Vec2::new(x as f32, y as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click fires
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.fire = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start: hide the start screen and begin a session
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("overlay") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if let Some(el) = document.get_element_by_id("start-screen") {
                    let _ = el.set_attribute("class", "hidden");
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.restart(js_sys::Date::now() as u64);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart after game over
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute toggle gates all audio cues
        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let muted = game.borrow_mut().audio.toggle_muted();
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(el) = document.get_element_by_id("mute-btn") {
                    el.set_text_content(Some(if muted { "Sound: Off" } else { "Sound: On" }));
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
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
            let document = web_sys::window().unwrap().document().unwrap();
            let mut g = game.borrow_mut();

            // Delta in milliseconds, capped so a background tab can't
            // produce a giant catch-up step
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) as f32).min(100.0)
            } else {
                16.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud(&document);
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
fn main() {
    use glam::Vec2;
    use strike_zone::consts::{FIELD_H, FIELD_W};
    use strike_zone::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Strike Zone (native) starting...");
    log::info!("Native mode is a headless smoke run; build for wasm32 for the playable version");

    // Drive a short seeded session: circle the field and fire at the middle
    let mut state = GameState::new(0xC0FFEE);
    let mut ticks = 0u32;
    while state.phase == GamePhase::Playing && ticks < 7500 {
        let input = TickInput {
            turn_right: true,
            throttle_up: ticks % 120 < 60,
            fire: ticks % 20 == 0,
            pointer: Some(Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0)),
            ..TickInput::default()
        };
        tick(&mut state, &input, 16.0);
        state.events.clear();
        ticks += 1;
    }

    let hud = state.hud();
    println!(
        "ran {} ticks: score {}, kills {}, level {}, lives {}, {} enemies on field",
        ticks,
        hud.score,
        hud.kills,
        hud.level.number(),
        hud.lives,
        hud.enemies
    );
}
