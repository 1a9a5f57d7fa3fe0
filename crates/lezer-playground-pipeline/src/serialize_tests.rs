use lezer_playground_core::ParseTreeNode;

use crate::serialize::{SerializeError, serialize};
use crate::test_utils::{Event, MockTree};

fn enter(name: &str, from: usize, to: usize) -> Event {
    Event::Enter(name.to_string(), from, to)
}

#[test]
fn nested_events_build_tree() {
    let tree = MockTree(vec![
        enter("Program", 0, 5),
        enter("A", 0, 2),
        enter("B", 1, 2),
        Event::Leave,
        Event::Leave,
        enter("C", 3, 5),
        Event::Leave,
        Event::Leave,
    ]);

    let node = serialize(&tree).unwrap();

    insta::assert_snapshot!(node.printer().dump(), @r"
    Program 0..5
      A 0..2
        B 1..2
      C 3..5
    ");
    assert_eq!(node.node_count(), 4);
}

#[test]
fn single_leaf_root() {
    let tree = MockTree(vec![enter("P", 0, 1), Event::Leave]);

    assert_eq!(serialize(&tree), Ok(ParseTreeNode::new("P", 0, 1)));
}

#[test]
fn leave_without_enter() {
    let tree = MockTree(vec![enter("P", 0, 1), Event::Leave, Event::Leave]);

    assert_eq!(serialize(&tree), Err(SerializeError::UnbalancedLeave));
}

#[test]
fn unclosed_frames() {
    let tree = MockTree(vec![enter("P", 0, 1), enter("Q", 0, 1), Event::Leave]);

    assert_eq!(serialize(&tree), Err(SerializeError::UnclosedNodes(1)));
}

#[test]
fn second_root() {
    let tree = MockTree(vec![
        enter("P", 0, 1),
        Event::Leave,
        enter("Q", 1, 2),
        Event::Leave,
    ]);

    assert_eq!(serialize(&tree), Err(SerializeError::MultipleRoots));
}

#[test]
fn no_events() {
    assert_eq!(serialize(&MockTree(vec![])), Err(SerializeError::Empty));
}

#[test]
fn first_error_wins() {
    let tree = MockTree(vec![Event::Leave, enter("P", 0, 1)]);

    assert_eq!(serialize(&tree), Err(SerializeError::UnbalancedLeave));
}

#[test]
fn error_messages() {
    assert_eq!(
        SerializeError::UnclosedNodes(2).to_string(),
        "2 nodes were never left"
    );
    assert_eq!(
        SerializeError::UnbalancedLeave.to_string(),
        "leave event without a matching enter"
    );
}
