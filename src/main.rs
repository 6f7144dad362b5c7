//! Pirate Royale entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde::Serialize;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use pirate_royale::consts::SIM_DT;
    use pirate_royale::identity::GameStats;
    use pirate_royale::platform::{Camera, InputState, LocalStore, now_ms};
    use pirate_royale::sim::{FrameSnapshot, GameEvent, GameRng};
    use pirate_royale::{Game, GameConfig, Identity, Phase};

    // The page draws from whatever Rust publishes here
    #[wasm_bindgen(inline_js = "
        export function publish_frame(json) {
            const frame = JSON.parse(json);
            window.pirateFrame = frame;
            if (typeof window.onPirateFrame === 'function') {
                window.onPirateFrame(frame);
            }
        }
    ")]
    extern "C" {
        fn publish_frame(json: &str);
    }

    /// Everything the page needs for one frame
    #[derive(Serialize)]
    struct Published<'a> {
        phase: Phase,
        username: &'a str,
        best: GameStats,
        camera_origin: glam::Vec2,
        zoom: f32,
        frame: Option<&'a FrameSnapshot>,
        events: &'a [GameEvent],
        save_ok: Option<bool>,
    }

    struct App {
        game: Game,
        input: InputState,
        camera: Camera,
        last_time: f64,
        last_phase: Phase,
    }

    impl App {
        fn update(&mut self, dt: f32) {
            let input = self.input.snapshot();
            let events = self.game.frame(dt, Some(&input), &self.camera);

            let snapshot = self.game.snapshot();
            if let Some(player) = snapshot.as_ref().and_then(|s| s.player()) {
                self.camera.center_on(player.pos);
            }

            let published = Published {
                phase: self.game.phase(),
                username: self.game.identity().username(),
                best: self.game.best(),
                camera_origin: self.camera.origin,
                zoom: self.camera.zoom,
                frame: snapshot.as_ref(),
                events: &events,
                save_ok: self.game.last_save_ok(),
            };
            match serde_json::to_string(&published) {
                Ok(json) => publish_frame(&json),
                Err(e) => log::warn!("Frame not published: {e}"),
            }

            if self.game.phase() != self.last_phase {
                self.last_phase = self.game.phase();
                update_screens(self.last_phase);
            }
        }
    }

    fn document() -> Result<web_sys::Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    /// Show the overlay matching `phase`
    fn update_screens(phase: Phase) {
        let Ok(document) = document() else {
            return;
        };
        let screens = [
            ("menu", Phase::Menu),
            ("hud", Phase::Playing),
            ("game-over", Phase::GameOver),
        ];
        for (id, shown_in) in screens {
            if let Some(el) = document.get_element_by_id(id) {
                let class = if phase == shown_in { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger: {e}")));
        }

        log::info!("Pirate Royale starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = document()?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let width = canvas.client_width() as f32;
        let height = canvas.client_height() as f32;

        let mut rng = GameRng::new(now_ms() as u64);
        let identity = Identity::init(Box::new(LocalStore), &mut rng, now_ms());
        let game = Game::new(GameConfig::load(), identity);

        let app = Rc::new(RefCell::new(App {
            game,
            input: InputState::new(),
            camera: Camera::new(width, height),
            last_time: 0.0,
            last_phase: Phase::Menu,
        }));

        if let Some(el) = document.get_element_by_id("name-input") {
            if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                input.set_value(app.borrow().game.identity().username());
            }
        }
        update_screens(Phase::Menu);

        setup_input_handlers(&window, &canvas, app.clone());
        setup_buttons(&document, app.clone());

        request_animation_frame(app);

        log::info!("Pirate Royale running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().input.key_down(&event.key(), &event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().input.key_up(&event.key(), &event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse position relative to the canvas
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                app.borrow_mut().input.pointer_move(x, y);
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for (name, down) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.pointer_button(down);
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: release everything so keys don't stick
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().input.reset();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize keeps the camera viewport in CSS pixels
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let w = canvas_clone.client_width() as f32;
                let h = canvas_clone.client_height() as f32;
                app.borrow_mut().camera.resize(w, h);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("play-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                if let Some(name) = name_input_value() {
                    if let Err(e) = a.game.rename_player(&name) {
                        log::warn!("Keeping previous name: {e}");
                    }
                }
                let seed = now_ms() as u64;
                a.game.start_game(seed);
                a.input.reset();
                a.last_time = 0.0;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.return_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn name_input_value() -> Option<String> {
        document()
            .ok()?
            .get_element_by_id("name-input")?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pirate_royale::consts::SIM_DT;
    use pirate_royale::identity::MemoryStore;
    use pirate_royale::platform::now_ms;
    use pirate_royale::sim::{GameEvent, GameRng, IdentityProjection};
    use pirate_royale::{Game, GameConfig, Identity, Phase, format_time};

    env_logger::init();
    log::info!("Pirate Royale (native) starting...");
    log::info!("Headless match with an idle player; run the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| now_ms() as u64);

    let mut rng = GameRng::new(seed);
    let identity = Identity::init(Box::new(MemoryStore::new()), &mut rng, now_ms());
    let mut game = Game::new(GameConfig::load(), identity);
    game.start_game(seed);

    // Twenty minutes of simulated time is far past the last zone shrink
    let max_frames = (20.0 * 60.0 / SIM_DT) as u32;
    for _ in 0..max_frames {
        for event in game.frame(SIM_DT, None, &IdentityProjection) {
            if let GameEvent::ZoneShrunk { radius } = event {
                log::debug!("Zone radius now {radius:.0}");
            }
        }
        if game.phase() == Phase::GameOver {
            break;
        }
    }

    match game.snapshot() {
        Some(snap) => {
            println!(
                "seed {seed}: {:?} after {}, rank {:?}, {} alive, {} coins",
                snap.outcome,
                format_time(snap.time),
                snap.final_rank,
                snap.alive,
                snap.stats.coins
            );
            for row in &snap.leaderboard {
                println!("  #{} {} ({} kills)", row.rank, row.name, row.kills);
            }
        }
        None => log::warn!("No match state to report"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
