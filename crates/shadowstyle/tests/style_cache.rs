//! End-to-end behavior of the stylesheet cache.
//!
//! These tests drive the public API only, with a scripted fetcher that counts
//! calls and a recording slot that logs every write in order.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use proptest::prelude::*;
use shadowstyle::{
    ElementPhase, ElementStyle, FetchError, LoadState, StyleError, StyleFetcher, StyleNode,
    StyleLoad, StyleRegistry, StyleSlot, StyledElement, PLACEHOLDER_STYLE,
};

#[derive(Default)]
struct Script {
    responses: RefCell<HashMap<String, VecDeque<Result<String, ()>>>>,
    calls: RefCell<usize>,
}

impl Script {
    fn then_ok(self, id: &str, text: &str) -> Self {
        self.push(id, Ok(text.to_string()));
        self
    }

    fn then_fail(self, id: &str) -> Self {
        self.push(id, Err(()));
        self
    }

    fn push(&self, id: &str, response: Result<String, ()>) {
        self.responses
            .borrow_mut()
            .entry(id.to_string())
            .or_default()
            .push_back(response);
    }

    fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

#[async_trait(?Send)]
impl StyleFetcher for Script {
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        *self.calls.borrow_mut() += 1;
        let next = self
            .responses
            .borrow_mut()
            .get_mut(identifier)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(text)) => Ok(text),
            _ => Err(FetchError::NotFound {
                identifier: identifier.to_string(),
            }),
        }
    }
}

struct Recorder {
    id: usize,
    log: Rc<RefCell<Vec<(usize, String)>>>,
}

impl StyleSlot for Recorder {
    fn set_text(&self, text: &str) {
        self.log.borrow_mut().push((self.id, text.to_string()));
    }
}

fn setup(script: Script) -> (StyleRegistry, Rc<Script>) {
    let script = Rc::new(script);
    let registry = StyleRegistry::new(Rc::clone(&script) as Rc<dyn StyleFetcher>);
    (registry, script)
}

fn node_element(
    registry: &StyleRegistry,
    id: &str,
) -> (StyledElement, Option<StyleLoad>, Rc<StyleNode>) {
    let node = Rc::new(StyleNode::new());
    let (element, load) = StyledElement::new(
        registry,
        &ElementStyle::new(id),
        Rc::clone(&node) as Rc<dyn StyleSlot>,
    );
    (element, load, node)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Fetch deduplication
// =============================================================================

#[tokio::test]
async fn test_many_elements_one_fetch() {
    let (registry, script) = setup(Script::default().then_ok("a.css", "a{}"));

    let mut elements = Vec::new();
    let mut loads = Vec::new();
    for _ in 0..10 {
        let (element, load, node) = node_element(&registry, "a.css");
        elements.push((element, node));
        loads.extend(load);
    }
    assert_eq!(loads.len(), 1);
    assert_eq!(registry.get("a.css").unwrap().pending_len(), 10);

    for load in loads {
        load.await.unwrap();
    }
    assert_eq!(script.calls(), 1);
    assert!(elements.iter().all(|(_, node)| node.text() == "a{}"));
}

#[tokio::test]
async fn test_ensure_loaded_twice_flushes_both_callers() {
    let (registry, script) = setup(Script::default().then_ok("a.css", "a{}"));
    let entry = registry.get_or_create("a.css");
    let first: Rc<StyleNode> = Rc::new(StyleNode::new());
    let second: Rc<StyleNode> = Rc::new(StyleNode::new());

    entry.enqueue(&(Rc::clone(&first) as Rc<dyn StyleSlot>));
    let load = entry.ensure_loaded();
    entry.enqueue(&(Rc::clone(&second) as Rc<dyn StyleSlot>));
    let again = entry.ensure_loaded();

    assert!(load.is_some());
    assert!(again.is_none());
    load.unwrap().await.unwrap();

    assert_eq!(script.calls(), 1);
    assert_eq!(first.text(), "a{}");
    assert_eq!(second.text(), "a{}");
}

#[tokio::test]
async fn test_identifiers_load_independently() {
    let (registry, script) = setup(
        Script::default()
            .then_ok("a.css", "a{}")
            .then_ok("b.css", "b{}"),
    );

    let (a, a_load, a_node) = node_element(&registry, "a.css");
    let (_b, b_load, b_node) = node_element(&registry, "b.css");

    b_load.unwrap().await.unwrap();
    assert_eq!(b_node.text(), "b{}");
    assert_eq!(a_node.text(), PLACEHOLDER_STYLE);
    assert_eq!(a.phase(), ElementPhase::Waiting);

    a_load.unwrap().await.unwrap();
    assert_eq!(a_node.text(), "a{}");
    assert_eq!(script.calls(), 2);
}

// =============================================================================
// Placeholder and ordering
// =============================================================================

#[tokio::test]
async fn test_every_element_sees_placeholder_first() {
    let (registry, _) = setup(Script::default().then_ok("a.css", "a{}"));
    let log = Rc::new(RefCell::new(Vec::new()));
    let make = |id: usize| {
        let slot: Rc<dyn StyleSlot> = Rc::new(Recorder {
            id,
            log: Rc::clone(&log),
        });
        let (element, load) =
            StyledElement::new(&registry, &ElementStyle::new("a.css"), Rc::clone(&slot));
        (element, load, slot)
    };

    let (_cold, cold_load, _cold_slot) = make(1);
    cold_load.unwrap().await.unwrap();
    let (_warm, warm_load, _warm_slot) = make(2);
    assert!(warm_load.is_none());

    let writes = log.borrow().clone();
    assert_eq!(
        writes,
        vec![
            (1, PLACEHOLDER_STYLE.to_string()),
            (1, "a{}".to_string()),
            (2, PLACEHOLDER_STYLE.to_string()),
            (2, "a{}".to_string()),
        ]
    );
}

proptest! {
    #[test]
    fn prop_flush_follows_construction_order(count in 1usize..24) {
        let (registry, script) = setup(Script::default().then_ok("p.css", "p{}"));
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut elements = Vec::new();
        let mut loads = Vec::new();
        let mut slots = Vec::new();
        for id in 0..count {
            let slot: Rc<dyn StyleSlot> = Rc::new(Recorder { id, log: Rc::clone(&log) });
            let (element, load) =
                StyledElement::new(&registry, &ElementStyle::new("p.css"), Rc::clone(&slot));
            elements.push(element);
            loads.extend(load);
            slots.push(slot);
        }
        log.borrow_mut().clear();

        prop_assert_eq!(loads.len(), 1);
        block_on(loads.remove(0)).unwrap();

        let order: Vec<usize> = log.borrow().iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(order, (0..count).collect::<Vec<_>>());
        prop_assert_eq!(script.calls(), 1);
    }
}

// =============================================================================
// Failure and retry
// =============================================================================

#[tokio::test]
async fn test_failure_then_retry_styles_everyone() {
    let (registry, script) = setup(
        Script::default()
            .then_fail("a.css")
            .then_ok("a.css", "body{color:red}"),
    );

    let (e1, load, n1) = node_element(&registry, "a.css");
    let err = load.unwrap().await.unwrap_err();
    assert!(matches!(err, StyleError::Fetch { ref identifier, .. } if identifier == "a.css"));
    assert_eq!(registry.get("a.css").unwrap().state(), LoadState::Unloaded);
    assert_eq!(n1.text(), PLACEHOLDER_STYLE);

    let (_e2, retry, n2) = node_element(&registry, "a.css");
    let (_e3, joined, _) = node_element(&registry, "a.css");
    let retry = retry.expect("construction after failure retries");
    assert!(joined.is_none());
    retry.await.unwrap();

    assert_eq!(script.calls(), 2);
    assert_eq!(n1.text(), "body{color:red}");
    assert_eq!(n2.text(), "body{color:red}");
    assert_eq!(e1.phase(), ElementPhase::Styled);
}

#[tokio::test]
async fn test_failure_without_retry_stays_hidden() {
    let (registry, _) = setup(Script::default().then_fail("a.css"));

    let (element, load, node) = node_element(&registry, "a.css");
    assert!(load.unwrap().await.is_err());

    assert_eq!(element.phase(), ElementPhase::Waiting);
    assert_eq!(node.text(), PLACEHOLDER_STYLE);
    assert_eq!(node.write_count(), 1);
}
