//! Barkour entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent};

    use barkour::consts::SIM_DT;
    use barkour::input::{InputMapper, Key, PointerSample, Viewport};
    use barkour::leaderboard::{
        CloudClient, CloudConfig, CloudReporter, NullReporter, ScoreReporter, SessionHandle,
    };
    use barkour::persistence::KeyValueStore;
    use barkour::platform::{LocalStorageStore, PerformanceClock};
    use barkour::renderer::RenderState;
    use barkour::scene::{self, DrawList};
    use barkour::{Action, Game, GameEvent, Services, Settings, Tuning, assets, ui};

    #[derive(Debug, thiserror::Error)]
    enum StartupError {
        #[error("canvas unavailable")]
        Canvas,
        #[error("cannot create surface: {0}")]
        Surface(#[from] wgpu::CreateSurfaceError),
        #[error("no GPU adapter: {0}")]
        Adapter(#[from] wgpu::RequestAdapterError),
        #[error("cannot open GPU device: {0}")]
        Device(#[from] wgpu::RequestDeviceError),
    }

    /// Browser-side state around the core `Game`
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        input: InputMapper,
        settings: Settings,
        store: Rc<dyn KeyValueStore>,
        draw_list: DrawList,
        canvas: HtmlCanvasElement,
        last_time: f64,
    }

    impl App {
        fn act(&mut self, action: Action) {
            if !self.game.handle(action) {
                log::debug!("{action:?} ignored on {:?}", self.game.screen());
            }
        }

        fn viewport(&self) -> Viewport {
            Viewport {
                width: self.canvas.client_width() as f32,
                height: self.canvas.client_height() as f32,
            }
        }

        fn toggle_hitboxes(&mut self) {
            self.settings.show_hitboxes = !self.settings.show_hitboxes;
            self.settings.save(self.store.as_ref());
            log::info!("Hitboxes: {}", self.settings.show_hitboxes);
        }

        /// Size the canvas for the current window and reconfigure the surface
        fn fit_canvas(&mut self) {
            let (width, height) = fit_canvas(&self.canvas, &self.settings, self.game.tuning());
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(width, height);
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.game.update(dt);
            for event in self.game.drain_events() {
                log_event(&event);
            }

            self.draw_list.clear();
            scene::render(&self.game, &mut self.draw_list, &self.settings);

            if let Some(render_state) = &mut self.render_state {
                match render_state.render(&self.draw_list) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::ScreenChanged { from, to } => log::info!("{from:?} -> {to:?}"),
            GameEvent::NewHighScore(score) => log::info!("New high score: {score}"),
            GameEvent::RoundOver(report) => log::info!(
                "Round over: {} ({} / {})",
                report.score,
                report.difficulty.key(),
                report.character.name()
            ),
            GameEvent::Jumped | GameEvent::ObstacleSpawned(_) => log::trace!("{event:?}"),
        }
    }

    /// Set the CSS and backing sizes of the canvas; returns the backing size
    fn fit_canvas(canvas: &HtmlCanvasElement, settings: &Settings, tuning: &Tuning) -> (u32, u32) {
        let Some(window) = web_sys::window() else {
            return (canvas.width(), canvas.height());
        };
        let inner = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        let viewport_w = inner(window.inner_width());
        let viewport_h = inner(window.inner_height());
        let aspect = tuning.canvas.width / tuning.canvas.height;
        let (css_w, css_h) = settings.canvas_size(viewport_w, viewport_h, aspect);

        let style = canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));

        let dpr = window.device_pixel_ratio() as f32;
        let width = ((css_w * dpr) as u32).max(1);
        let height = ((css_h * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        logical: Vec2,
    ) -> Result<RenderState, StartupError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        Ok(RenderState::new(surface, &adapter, width, height, logical).await?)
    }

    /// Renderer-less failure: the message goes into the page instead
    fn show_fatal(message: &str) {
        log::error!("{message}");
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            el.set_text_content(Some(message));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Barkour {} starting...", barkour::consts::VERSION);

        if let Err(e) = start().await {
            show_fatal(&format!("Failed to start: {e}"));
        }
    }

    async fn start() -> Result<(), StartupError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(StartupError::Canvas)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::Canvas)?;

        let store: Rc<dyn KeyValueStore> = Rc::new(LocalStorageStore);
        let settings = Settings::load(store.as_ref());
        let tuning = Rc::new(Tuning::default());

        // Cloud features are compiled in only when the backend is configured
        let session = SessionHandle::new();
        let client = CloudConfig::from_env()
            .map(|config| Rc::new(CloudClient::new(config, session.clone(), store.clone())));
        let reporter: Box<dyn ScoreReporter> = match &client {
            Some(client) => Box::new(CloudReporter::new(client.clone())),
            None => Box::new(NullReporter),
        };
        let services = Services {
            store: store.clone(),
            clock: Box::new(PerformanceClock),
            session,
            reporter,
        };
        ui::install(client);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(tuning.clone(), services, seed);
        log::info!("Game initialized with seed: {seed}");

        let (width, height) = fit_canvas(&canvas, &settings, &tuning);
        let logical = Vec2::new(tuning.canvas.width, tuning.canvas.height);
        let mut render_state = init_renderer(&canvas, width, height, logical).await?;

        // No frame runs until every sprite is on the GPU; a failure is fatal
        let images = match assets::load_all().await {
            Ok(images) => images,
            Err(e) => {
                game.fail_loading(e.to_string());
                show_fatal(&format!("Failed to load assets: {e}"));
                return Ok(());
            }
        };
        for image in &images {
            render_state.load_sprite(image.sprite, &image.rgba, image.width, image.height);
        }
        game.finish_loading();

        let app = Rc::new(RefCell::new(App {
            game,
            render_state: Some(render_state),
            input: InputMapper::new(),
            settings,
            store,
            draw_list: DrawList::new(),
            canvas: canvas.clone(),
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_window_handlers(app.clone());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        request_animation_frame(app);

        log::info!("Barkour running!");
        Ok(())
    }

    /// Keys typed into the account form belong to the form
    fn targets_text_input(event: &web_sys::Event) -> bool {
        event
            .target()
            .is_some_and(|t| t.dyn_ref::<HtmlInputElement>().is_some())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if targets_text_input(&event) {
                    return;
                }
                let mut a = app.borrow_mut();
                if event.code() == "KeyH" && !event.repeat() {
                    a.toggle_hitboxes();
                    return;
                }
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep Space and the arrows from scrolling the page
                event.prevent_default();
                let screen = a.game.screen();
                if let Some(action) = a.input.key_down(screen, key) {
                    a.act(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    app.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer (mouse and touch)
        let sample = |event: &PointerEvent| PointerSample {
            x: event.offset_x() as f32,
            y: event.offset_y() as f32,
            time_ms: event.time_stamp(),
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                app.borrow_mut().input.pointer_down(sample(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let screen = a.game.screen();
                let viewport = a.viewport();
                if let Some(action) = a.input.pointer_up(screen, sample(&event), viewport) {
                    a.act(action);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                app.borrow_mut().input.cancel_pointer();
            });
            let _ = canvas.add_event_listener_with_callback(
                "pointercancel",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_window_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur: keyup never arrives for keys held at that moment
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.release_all();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_canvas();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a bot plays one round per difficulty and logs the result
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use barkour::persistence::{KeyValueStore, MemoryStore};
    use barkour::timer::ManualClock;
    use barkour::{Action, Game, GameEvent, ScreenState, Services, Tuning};

    /// Frames before giving up on a round (five minutes at 60 fps)
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Jump when the next pipe is this many ticks of travel away
    const LOOKAHEAD_TICKS: f32 = 14.0;

    env_logger::init();
    log::info!("Barkour (native) starting...");
    log::info!("Native mode runs a headless bot; serve the wasm build for the playable version");

    let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
    let tuning = Rc::new(Tuning::default());
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    for round in 0..3u64 {
        let clock = ManualClock::new();
        let services = Services::offline(store.clone(), Box::new(clock.clone()));
        let mut game = Game::new(tuning.clone(), services, seed + round);

        game.finish_loading();
        game.handle(Action::Confirm);
        // Easy, then Medium, then Hard
        for _ in 0..round {
            game.handle(Action::NavigateNext);
        }
        game.handle(Action::Confirm);
        let difficulty = game.selection().difficulty;

        let frame_ms = f64::from(barkour::consts::SIM_DT) * 1000.0;
        for _ in 0..MAX_FRAMES {
            if game.screen() != ScreenState::Playing {
                break;
            }
            let character = game.character().bounds();
            let reach = game.round().speed() * LOOKAHEAD_TICKS;
            let pipe_close = game.obstacles().obstacles().iter().any(|o| {
                let gap = o.bounds().left() - character.right();
                (0.0..reach).contains(&gap)
            });
            if pipe_close {
                game.handle(Action::Jump);
            }

            clock.advance(frame_ms);
            game.update(barkour::consts::SIM_DT);
        }

        for event in game.drain_events() {
            match event {
                GameEvent::NewHighScore(score) => log::info!("New high score: {score}"),
                GameEvent::RoundOver(report) => log::info!(
                    "{}: scored {} in {} ticks",
                    difficulty.key(),
                    report.score,
                    game.ticks()
                ),
                _ => {}
            }
        }
        if game.screen() == ScreenState::Playing {
            log::info!(
                "{}: bot survived, score {}",
                difficulty.key(),
                game.round().display_score()
            );
        }
    }

    println!(
        "High score after demo: {}",
        barkour::persistence::LocalRecords::new(store).high_score()
    );
}
