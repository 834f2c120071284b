//! In-memory `Page` and `Session` used by unit tests. Counts and script
//! results are scripted as sequences whose last value repeats, so a test can
//! model a list that fills in over successive polls or a page whose content
//! changes per navigation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::browser::page::{Page, Selector, Session};
use crate::error::{AppError, Result};

#[derive(Default)]
struct FakeState {
    counts: HashMap<String, VecDeque<usize>>,
    attrs: HashMap<(String, String), Vec<String>>,
    evals: HashMap<String, VecDeque<Value>>,
    clickable: HashSet<Selector>,
    clicks: Vec<Selector>,
    visited: Vec<String>,
    failing_urls: HashSet<String>,
    closed: bool,
}

/// Clones share state, so a test can keep a handle to a page it scripted
/// while the code under test owns and eventually closes the boxed original.
///
/// When no counts sequence was registered for a selector, `visible_count`
/// reports the length of an attrs list registered for that same selector, so
/// list fixtures set up with `set_attrs` alone read as already rendered.
#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_counts(&self, css: &str, seq: Vec<usize>) {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(css.to_string(), seq.into());
    }

    pub fn set_attrs(&self, css: &str, attr: &str, values: &[&str]) {
        self.state.lock().unwrap().attrs.insert(
            (css.to_string(), attr.to_string()),
            values.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn set_eval(&self, script: &str, value: Value) {
        self.set_eval_seq(script, vec![value]);
    }

    pub fn set_eval_seq(&self, script: &str, values: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .evals
            .insert(script.to_string(), values.into());
    }

    pub fn set_clickable(&self, selector: Selector) {
        self.state.lock().unwrap().clickable.insert(selector);
    }

    pub fn fail_navigation_to(&self, url: &str) {
        self.state.lock().unwrap().failing_urls.insert(url.to_string());
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn clicks(&self) -> Vec<Selector> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn was_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

/// Session handing out pre-scripted pages in the order they were pushed.
#[derive(Default)]
pub struct FakeSession {
    pages: Mutex<VecDeque<FakePage>>,
    opened: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: FakePage) {
        self.pages.lock().unwrap().push_back(page);
    }

    /// How many pages the code under test has opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn open_page(&self) -> Result<Box<dyn Page>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let page = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Timeout("no scripted page left".to_string()))?;
        Ok(Box::new(page))
    }
}

/// Pops the next value; the last one repeats forever.
fn advance<T: Clone>(seq: &mut VecDeque<T>) -> Option<T> {
    if seq.len() > 1 {
        seq.pop_front()
    } else {
        seq.front().cloned()
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_urls.contains(url) {
            return Err(AppError::Timeout(format!("navigation failed: {url}")));
        }
        state.visited.push(url.to_string());
        Ok(())
    }

    async fn visible_count(&self, css: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if let Some(seq) = state.counts.get_mut(css) {
            return Ok(advance(seq).unwrap_or(0));
        }
        // Fall back to the configured attribute list for the same selector.
        let fallback = state
            .attrs
            .iter()
            .find(|((sel, _), _)| sel == css)
            .map(|(_, values)| values.len())
            .unwrap_or(0);
        Ok(fallback)
    }

    async fn visible_attrs(&self, css: &str, attr: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attrs
            .get(&(css.to_string(), attr.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        let value = state
            .evals
            .get_mut(script)
            .and_then(advance)
            .unwrap_or(Value::Null);
        Ok(value)
    }

    async fn click_first_visible(&self, selector: &Selector) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.clickable.contains(selector) {
            state.clicks.push(*selector);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn scroll_by(&self, _dy: i64) -> Result<()> {
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .visited
            .last()
            .cloned()
            .unwrap_or_default())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}
