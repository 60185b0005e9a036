//! Recording fake engine for tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{BrowserContext, EngineView};
use crate::tab::FrozenState;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

type CallLog = Rc<RefCell<Vec<String>>>;

/// Context whose views append every engine call to a shared log
pub struct FakeContext {
    calls: CallLog,
    allow_files: bool,
}

impl FakeContext {
    pub fn new() -> Self {
        init_tracing();
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            allow_files: true,
        }
    }

    pub fn with_file_permission(mut self, allow: bool) -> Self {
        self.allow_files = allow;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl BrowserContext for FakeContext {
    fn create_view(&self, _incognito: bool) -> Box<dyn EngineView> {
        Box::new(FakeView {
            calls: self.calls.clone(),
            url: None,
        })
    }

    fn request_file_permission(&self, url: &str) -> bool {
        self.calls.borrow_mut().push(format!("permission:{}", url));
        self.allow_files
    }
}

/// View whose frozen state is simply its URL
pub struct FakeView {
    calls: CallLog,
    url: Option<String>,
}

impl FakeView {
    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl EngineView for FakeView {
    fn load_url(&mut self, url: &str) {
        self.record(format!("load:{}", url));
        self.url = Some(url.to_string());
    }

    fn restore_state(&mut self, state: &FrozenState) {
        self.record("restore");
        self.url = Some(String::from_utf8_lossy(state.as_bytes()).into_owned());
    }

    fn save_state(&self) -> FrozenState {
        FrozenState::new(self.url.clone().unwrap_or_default().into_bytes())
    }

    fn current_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn on_resume(&mut self) {
        self.record("resume");
    }

    fn on_pause(&mut self) {
        self.record("pause");
    }

    fn resume_timers(&mut self) {
        self.record("resume_timers");
    }

    fn pause_timers(&mut self) {
        self.record("pause_timers");
    }

    fn destroy(&mut self) {
        self.record("destroy");
    }
}
