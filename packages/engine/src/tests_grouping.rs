//! Collapse/expand state machine: exact splices, inverse law, visibility
//! exclusion, partner mirroring, and lifecycle.

use crate::config::GroupingConfig;
use crate::events::ViewEvent;
use crate::GroupedView;
use gridkit_model::{GrouperSpec, MemoryStore, Record, RecordId, SourceEvent};
use std::cell::RefCell;
use std::rc::Rc;

fn city_store() -> Rc<RefCell<MemoryStore>> {
    let mut store = MemoryStore::new("test").with_grouper(GrouperSpec::new("city"));
    store
        .insert_all(vec![
            Record::new("a").with_field("city", "X"),
            Record::new("b").with_field("city", "X"),
            Record::new("c").with_field("city", "Y"),
        ])
        .unwrap();
    Rc::new(RefCell::new(store))
}

fn capture(view: &mut GroupedView<MemoryStore>) -> Rc<RefCell<Vec<ViewEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    view.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn visible_ids(view: &GroupedView<MemoryStore>) -> Vec<String> {
    let mut ids = Vec::new();
    view.each(|r| ids.push(r.id().to_string()));
    ids
}

#[test]
fn test_collapse_then_expand_restores_exact_sequence() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());

    // "Y" starts collapsed: [a, b, placeholder(Y)]
    assert!(view.collapse_group("Y"));
    let before: Vec<_> = (0..view.len())
        .map(|i| view.get(i).unwrap().internal_id())
        .collect();
    let events = capture(&mut view);

    assert!(view.collapse_group("X"));
    assert_eq!(view.len(), 2);
    assert!(view.get(0).unwrap().is_placeholder());

    assert!(view.expand_group("X"));
    let after: Vec<_> = (0..view.len())
        .map(|i| view.get(i).unwrap().internal_id())
        .collect();
    assert_eq!(before, after);
    assert_eq!(visible_ids(&view)[..2], ["a".to_string(), "b".to_string()]);

    // The two Replace events are exact set-inverses at the same index.
    let events = events.borrow();
    let (collapse_replace, expand_replace) = match (&events[0], &events[2]) {
        (
            ViewEvent::Replace {
                index: ci,
                removed: cr,
                added: ca,
            },
            ViewEvent::Replace {
                index: ei,
                removed: er,
                added: ea,
            },
        ) => ((ci, cr, ca), (ei, er, ea)),
        other => panic!("Expected Replace pair, got {:?}", other),
    };
    assert_eq!(collapse_replace.0, expand_replace.0);
    assert_eq!(*collapse_replace.0, 0);
    let ids = |records: &[Record]| {
        records
            .iter()
            .map(|r| r.internal_id())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(collapse_replace.1), ids(expand_replace.2));
    assert_eq!(ids(collapse_replace.2), ids(expand_replace.1));

    assert!(matches!(events[1], ViewEvent::GroupCollapse { .. }));
    assert!(matches!(events[3], ViewEvent::GroupExpand { .. }));
}

#[test]
fn test_collapse_emits_replace_before_groupcollapse() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());
    let events = capture(&mut view);

    view.collapse_group("X");

    let events = events.borrow();
    assert_eq!(events.len(), 2);
    match &events[0] {
        ViewEvent::Replace {
            index,
            removed,
            added,
        } => {
            assert_eq!(*index, 0);
            assert_eq!(removed.len(), 2);
            assert_eq!(added.len(), 1);
            assert!(added[0].is_placeholder());
        }
        other => panic!("Expected Replace, got {:?}", other),
    }
    match &events[1] {
        ViewEvent::GroupCollapse { key } => assert_eq!(key.as_str(), "X"),
        other => panic!("Expected GroupCollapse, got {:?}", other),
    }
}

#[test]
fn test_visibility_exclusion_for_collapsed_members() {
    let store = city_store();
    let mut view = GroupedView::new(store.clone(), GroupingConfig::new());
    view.collapse_group("X");

    let member = store.borrow().get(&RecordId::from("a")).unwrap().clone();
    assert_eq!(view.index_of(&member), None);
    assert_eq!(view.index_of_total(&member), Some(0));

    // The placeholder is visible but has no total-space position.
    let placeholder = view.get(0).unwrap().clone();
    assert!(placeholder.is_placeholder());
    assert_eq!(view.index_of(&placeholder), Some(0));
    assert_eq!(view.index_of_total(&placeholder), None);
}

#[test]
fn test_visible_len_counts_one_per_collapsed_group() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());

    assert_eq!(view.len(), 3);
    view.collapse_group("X");
    assert_eq!(view.len(), 2); // placeholder(X) + c
    view.collapse_group("Y");
    assert_eq!(view.len(), 2); // placeholder(X) + placeholder(Y)
    assert_eq!(view.total_len(), 3);
}

#[test]
fn test_collapse_unresolved_or_empty_group_is_noop() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());
    let events = capture(&mut view);

    assert!(!view.collapse_group("Z"));
    assert!(!view.expand_group("Z"));
    assert!(events.borrow().is_empty());
    assert_eq!(view.len(), 3);
}

#[test]
fn test_collapse_twice_is_noop() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());

    assert!(view.collapse_group("X"));
    let events = capture(&mut view);
    assert!(!view.collapse_group("X"));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_expand_before_any_collapse_is_noop() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());
    let events = capture(&mut view);

    // No placeholder has ever been materialized for "X".
    assert!(!view.expand_group("X"));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_toggle_group_round_trips() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());

    assert!(view.toggle_group("X"));
    assert!(view.is_collapsed("X"));
    assert!(view.toggle_group("X"));
    assert!(!view.is_collapsed("X"));
}

#[test]
fn test_collapse_all_and_expand_all() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());

    view.collapse_all();
    assert_eq!(view.len(), 2);
    assert!(view.is_collapsed("X"));
    assert!(view.is_collapsed("Y"));

    view.expand_all();
    assert_eq!(view.len(), 3);
    assert_eq!(visible_ids(&view), vec!["a", "b", "c"]);
}

#[test]
fn test_placeholder_survives_group_object_replacement() {
    let store = city_store();
    let mut view = GroupedView::new(store.clone(), GroupingConfig::new());

    view.collapse_group("X");
    let placeholder_id = view.get(0).unwrap().internal_id();

    // Reload-style mutation: group objects are rebuilt wholesale.
    let event = store
        .borrow_mut()
        .insert(Record::new("d").with_field("city", "Y"))
        .unwrap();
    view.notify(event);

    // "X" stays collapsed and keeps the cached placeholder instance.
    assert!(view.is_collapsed("X"));
    assert_eq!(view.get(0).unwrap().internal_id(), placeholder_id);
    assert_eq!(view.len(), 3); // placeholder(X) + c + d
}

#[test]
fn test_partner_registry_mirrors_collapsed_state() {
    let store = city_store();
    let mut left = GroupedView::new(store.clone(), GroupingConfig::new());
    let mut right = GroupedView::new(store, GroupingConfig::new());

    left.link_partner(right.registry());
    right.link_partner(left.registry());

    left.collapse_group("X");
    assert!(right.is_collapsed("X"));

    left.expand_group("X");
    assert!(!right.is_collapsed("X"));

    right.collapse_group("X");
    assert!(left.is_collapsed("X"));
}

#[test]
fn test_group_removal_resyncs_and_relays_groupchange() {
    let store = city_store();
    let mut view = GroupedView::new(store.clone(), GroupingConfig::new());
    view.collapse_group("X");
    let events = capture(&mut view);

    let event = store.borrow_mut().set_grouper(None);
    view.notify(event);

    // Flat view again, placeholder gone.
    assert_eq!(visible_ids(&view), vec!["a", "b", "c"]);
    let events = events.borrow();
    assert!(matches!(events[0], ViewEvent::Refresh));
    match &events[1] {
        ViewEvent::GroupChange { grouper } => assert!(grouper.is_none()),
        other => panic!("Expected GroupChange, got {:?}", other),
    }
}

#[test]
fn test_id_change_rekeys_without_structural_events() {
    let store = city_store();
    let mut view = GroupedView::new(store.clone(), GroupingConfig::new());
    let events = capture(&mut view);

    let event = store
        .borrow_mut()
        .change_id(&RecordId::from("b"), "b2")
        .unwrap();
    view.notify(event);

    assert!(events.borrow().is_empty());
    assert_eq!(visible_ids(&view), vec!["a", "b2", "c"]);
    assert!(view.get_by_id(&RecordId::from("b2")).is_some());
    assert!(view.get_by_id(&RecordId::from("b")).is_none());
}

#[test]
fn test_bind_rebuilds_from_new_source_and_drops_group_state() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());
    view.collapse_group("X");

    let mut other = MemoryStore::new("other").with_grouper(GrouperSpec::new("city"));
    other
        .insert(Record::new("z").with_field("city", "X"))
        .unwrap();
    view.bind(Rc::new(RefCell::new(other)));

    assert_eq!(visible_ids(&view), vec!["z"]);
    assert!(!view.is_collapsed("X"));
}

#[test]
fn test_destroy_clears_state_and_ignores_everything() {
    let store = city_store();
    let mut view = GroupedView::new(store, GroupingConfig::new());
    let events = capture(&mut view);

    view.destroy();
    assert_eq!(view.len(), 0);
    assert_eq!(view.total_len(), 0);

    view.notify(SourceEvent::DataChanged);
    assert!(!view.collapse_group("X"));
    assert!(events.borrow().is_empty());
}
