use std::cell::RefCell;

use loveship_engine::{ExperienceConfig, InputEvent, LocationId, StageKind, StarId};
use wasm_bindgen::prelude::*;

pub mod runner;
pub mod storage;

pub use runner::ExperienceRunner;
pub use storage::LocalStorageStore;

thread_local! {
    static RUNNER: RefCell<Option<ExperienceRunner<LocalStorageStore>>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut ExperienceRunner<LocalStorageStore>) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Experience not initialized. Call experience_init() first.");
        f(runner)
    })
}

/// Start the experience. `config_json` may override any part of the content;
/// an invalid document is logged and the shipped content is used instead.
#[wasm_bindgen]
pub fn experience_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref() {
        Some(json) => ExperienceConfig::from_json(json).unwrap_or_else(|err| {
            log::error!("loveship: {}, using default content", err);
            ExperienceConfig::default()
        }),
        None => ExperienceConfig::default(),
    };
    let runner = ExperienceRunner::new(config, LocalStorageStore::open());

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("loveship: initialized");
}

#[wasm_bindgen]
pub fn experience_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn experience_submit_name(name: &str) {
    with_runner(|r| r.handle(InputEvent::SubmitName(name.to_string())));
}

#[wasm_bindgen]
pub fn experience_name_edited() {
    with_runner(|r| r.handle(InputEvent::NameEdited));
}

#[wasm_bindgen]
pub fn experience_click_location(id: u32) {
    with_runner(|r| r.handle(InputEvent::ClickLocation(LocationId(id))));
}

#[wasm_bindgen]
pub fn experience_turn_wheel(index: u32, delta: i32) {
    with_runner(|r| {
        r.handle(InputEvent::TurnWheel {
            index: index as usize,
            delta,
        })
    });
}

#[wasm_bindgen]
pub fn experience_check_code() {
    with_runner(|r| r.handle(InputEvent::CheckCode));
}

/// Only the first character of `letter` is used.
#[wasm_bindgen]
pub fn experience_guess_letter(letter: &str) {
    if let Some(c) = letter.chars().next() {
        with_runner(|r| r.handle(InputEvent::GuessLetter(c)));
    }
}

#[wasm_bindgen]
pub fn experience_select_star(id: &str) {
    with_runner(|r| r.handle(InputEvent::SelectStar(StarId::new(id))));
}

#[wasm_bindgen]
pub fn experience_crack_seal() {
    with_runner(|r| r.handle(InputEvent::CrackSeal));
}

#[wasm_bindgen]
pub fn experience_continue() {
    with_runner(|r| r.handle(InputEvent::Continue));
}

/// Debug tools. Returns false when debug mode is locked or the stage is unknown.
#[wasm_bindgen]
pub fn experience_jump_to(stage: u32) -> bool {
    let Some(stage) = StageKind::from_index(stage) else {
        log::warn!("loveship: unknown stage index {}", stage);
        return false;
    };
    with_runner(|r| r.jump_to(stage).is_ok())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_view_json() -> String {
    with_runner(|r| {
        r.view_json().unwrap_or_else(|err| {
            log::error!("loveship: failed to serialize view: {}", err);
            String::from("{}")
        })
    })
}

#[wasm_bindgen]
pub fn get_stage() -> u32 {
    with_runner(|r| r.stage().index())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}
