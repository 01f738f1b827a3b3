use super::*;
use std::cell::Cell;

/// Tiny graph for exercising the traversal: a node holds when its own flag
/// holds and every successor holds.
struct Graph {
    nodes: Vec<(bool, Vec<u32>)>,
    visits: Cell<u32>,
}

impl Graph {
    fn new(nodes: Vec<(bool, Vec<u32>)>) -> Self {
        Self {
            nodes,
            visits: Cell::new(0),
        }
    }

    fn holds(&self, node: u32, state: &mut VisitState<u32, bool>) -> bool {
        state.walk(node, true, |state| {
            self.visits.set(self.visits.get() + 1);
            let (flag, successors) = &self.nodes[node as usize];
            *flag && successors.iter().all(|&next| self.holds(next, state))
        })
    }
}

// ===================================================================
// enter / finish
// ===================================================================

#[test]
fn enter_then_finish_caches_result() {
    let mut state = VisitState::<u32, bool>::new();
    assert_eq!(state.enter(1, true), VisitEntry::Entered);
    assert!(state.is_in_flight(&1));
    assert_eq!(state.depth(), 1);
    assert!(!state.finish(1, false));
    assert!(!state.is_in_flight(&1));
    assert_eq!(state.enter(1, true), VisitEntry::Finished(false));
    assert_eq!(state.finished(&1), Some(false));
    assert_eq!(state.stats().computed, 1);
    assert_eq!(state.stats().cache_hits, 1);
}

#[test]
fn reentry_while_in_flight_yields_optimistic_default() {
    let mut state = VisitState::<u32, bool>::new();
    assert_eq!(state.enter(7, true), VisitEntry::Entered);
    assert_eq!(state.enter(7, false), VisitEntry::InFlight(true));
    assert_eq!(state.stats().cycle_hits, 1);
    state.finish(7, true);
}

#[test]
fn pair_keys_are_distinct_by_order() {
    let mut state = VisitState::<(u32, u32), bool>::new();
    assert_eq!(state.enter((1, 2), false), VisitEntry::Entered);
    assert_eq!(state.enter((2, 1), false), VisitEntry::Entered);
    state.finish((2, 1), true);
    state.finish((1, 2), false);
    assert_eq!(state.finished(&(2, 1)), Some(true));
    assert_eq!(state.finished(&(1, 2)), Some(false));
}

// ===================================================================
// walk
// ===================================================================

#[test]
fn self_loop_terminates() {
    let graph = Graph::new(vec![(true, vec![0])]);
    let mut state = VisitState::new();
    assert!(graph.holds(0, &mut state));
    assert_eq!(graph.visits.get(), 1);
    assert_eq!(state.stats().cycle_hits, 1);
    assert!(!state.is_provisional(&0));
}

#[test]
fn shared_successor_is_computed_once() {
    // 0 -> {1, 2}, 1 -> 3, 2 -> 3
    let graph = Graph::new(vec![
        (true, vec![1, 2]),
        (true, vec![3]),
        (true, vec![3]),
        (true, vec![]),
    ]);
    let mut state = VisitState::new();
    assert!(graph.holds(0, &mut state));
    assert_eq!(graph.visits.get(), 4);
    assert_eq!(state.stats().cache_hits, 1);
}

#[test]
fn wide_fan_in_is_linear_in_distinct_nodes() {
    // A ladder where every rung points at both rungs below: 2^n paths, n nodes.
    let n = 40u32;
    let nodes = (0..n)
        .map(|i| {
            if i + 2 < n {
                (true, vec![i + 1, i + 2])
            } else {
                (true, vec![])
            }
        })
        .collect();
    let graph = Graph::new(nodes);
    let mut state = VisitState::new();
    assert!(graph.holds(0, &mut state));
    assert_eq!(graph.visits.get(), n);
}

#[test]
fn refuted_assumption_drops_provisional_results() {
    // 0 -> {1, 2}; 1 -> 0; 2 fails.
    let graph = Graph::new(vec![(true, vec![1, 2]), (true, vec![0]), (false, vec![])]);
    let mut state = VisitState::new();

    assert!(!graph.holds(0, &mut state));
    // 1 was computed assuming 0 holds; that assumption was refuted.
    assert_eq!(state.finished(&1), None);
    assert_eq!(state.stats().invalidated, 1);

    // Recomputed against the finished result for 0.
    assert!(!graph.holds(1, &mut state));
    assert_eq!(state.finished(&1), Some(false));
}

#[test]
fn confirmed_assumption_keeps_provisional_results() {
    // 0 -> {1, 2}; 1 -> 0; 2 holds.
    let graph = Graph::new(vec![(true, vec![1, 2]), (true, vec![0]), (true, vec![])]);
    let mut state = VisitState::new();

    assert!(graph.holds(0, &mut state));
    assert_eq!(state.finished(&1), Some(true));
    assert!(!state.is_provisional(&1));
    assert_eq!(state.stats().invalidated, 0);

    let visits = graph.visits.get();
    assert!(graph.holds(1, &mut state));
    assert_eq!(graph.visits.get(), visits);
}

#[test]
fn dependency_through_provisional_cache_hit_is_tracked() {
    // 0 -> {1, 2, 3}; 1 -> 0; 2 -> 1; 3 fails.
    // 2 reads the cached (still provisional) result for 1.
    let graph = Graph::new(vec![
        (true, vec![1, 2, 3]),
        (true, vec![0]),
        (true, vec![1]),
        (false, vec![]),
    ]);
    let mut state = VisitState::new();

    assert!(!graph.holds(0, &mut state));
    assert_eq!(state.stats().cache_hits, 1);
    assert_eq!(state.finished(&1), None);
    assert_eq!(state.finished(&2), None);
    assert_eq!(state.stats().invalidated, 2);
}

#[test]
fn transitive_provisional_results_are_dropped_together() {
    // 0 -> {1, 3}; 1 -> {0, 2}; 2 -> 1; 3 fails.
    // 2 is computed on top of 1 (itself resting on 0) and must be dropped
    // along with 1 once 0 fails.
    let graph = Graph::new(vec![
        (true, vec![1, 3]),
        (true, vec![0, 2]),
        (true, vec![1]),
        (false, vec![]),
    ]);
    let mut state = VisitState::new();

    assert!(!graph.holds(0, &mut state));
    assert_eq!(state.finished(&1), None);
    assert_eq!(state.finished(&2), None);
    assert!(!graph.holds(2, &mut state));
}

#[test]
fn refuted_inner_frame_drops_results_that_also_rest_on_an_ancestor() {
    // 0 = 1 | 5; 1 = 2 & 0; 2 = 3 & 4; 3 = 2 & 0; 4 fails; 5 = 0.
    // 3 reads both 2 (in flight) and 0, so it rests on 0. 2 then fails while
    // 0 ends up holding through 5, and 3 must not survive as `true`.
    let nodes = vec![
        Node::Or(vec![1, 5]),
        Node::And(vec![2, 0]),
        Node::And(vec![3, 4]),
        Node::And(vec![2, 0]),
        Node::Const(false),
        Node::And(vec![0]),
    ];
    let mut state = VisitState::new();

    assert!(eval(&nodes, 0, &mut state));
    assert_eq!(state.finished(&3), None);
    assert!(state.stats().invalidated >= 1);
    assert!(!eval(&nodes, 3, &mut state));
    assert_eq!(state.finished(&3), Some(false));
}

enum Node {
    Const(bool),
    And(Vec<usize>),
    Or(Vec<usize>),
}

fn eval(nodes: &[Node], node: usize, state: &mut VisitState<usize, bool>) -> bool {
    state.walk(node, true, |state| match &nodes[node] {
        Node::Const(value) => *value,
        Node::And(next) => next.iter().all(|&n| eval(nodes, n, state)),
        Node::Or(next) => next.iter().any(|&n| eval(nodes, n, state)),
    })
}

/// Iterate down from all-`true` until nothing changes.
fn greatest_fixpoint(nodes: &[Node]) -> Vec<bool> {
    let mut values = vec![true; nodes.len()];
    loop {
        let mut changed = false;
        for (i, node) in nodes.iter().enumerate() {
            let value = match node {
                Node::Const(value) => *value,
                Node::And(next) => next.iter().all(|&n| values[n]),
                Node::Or(next) => next.iter().any(|&n| values[n]),
            };
            if value != values[i] {
                values[i] = value;
                changed = true;
            }
        }
        if !changed {
            return values;
        }
    }
}

/// Deterministic linear congruential generator.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) % bound as u64) as usize
    }
}

fn random_graph(rng: &mut Lcg) -> Vec<Node> {
    let len = 2 + rng.below(9);
    (0..len)
        .map(|_| {
            let kind = rng.below(7);
            let next: Vec<usize> = (0..rng.below(4)).map(|_| rng.below(len)).collect();
            match kind {
                0 => Node::Const(false),
                1 => Node::Const(true),
                2..=3 => Node::And(next),
                _ => Node::Or(next),
            }
        })
        .collect()
}

#[test]
fn shared_state_agrees_with_greatest_fixpoint_on_and_or_graphs() {
    let mut rng = Lcg(0x5eed);
    for round in 0..2000 {
        let nodes = random_graph(&mut rng);
        let expected = greatest_fixpoint(&nodes);

        // One state across every query, in a shuffled order.
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        for i in (1..order.len()).rev() {
            order.swap(i, rng.below(i + 1));
        }
        let mut state = VisitState::new();
        for &node in &order {
            assert_eq!(
                eval(&nodes, node, &mut state),
                expected[node],
                "round {round}, node {node}"
            );
        }
        for node in 0..nodes.len() {
            assert!(!state.is_provisional(&node));
            if let Some(value) = state.finished(&node) {
                assert_eq!(value, expected[node], "round {round}, cached node {node}");
            }
        }
    }
}

#[test]
fn state_is_empty_after_walk() {
    let graph = Graph::new(vec![(true, vec![1]), (true, vec![0])]);
    let mut state = VisitState::new();
    graph.holds(0, &mut state);
    assert_eq!(state.depth(), 0);
    assert!(!state.is_in_flight(&0));
    assert!(!state.is_in_flight(&1));
}

// ===================================================================
// Debug-mode safety
// ===================================================================

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "does not match the innermost entered key")]
fn debug_finish_out_of_order_panics() {
    let mut state = VisitState::<u32, bool>::new();
    state.enter(1, true);
    state.enter(2, true);
    state.finish(1, true);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "without a matching enter()")]
fn debug_finish_without_enter_panics() {
    let mut state = VisitState::<u32, bool>::new();
    state.finish(1, true);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "still in flight")]
fn debug_drop_with_keys_in_flight_panics() {
    let mut state = VisitState::<u32, bool>::new();
    state.enter(1, true);
    drop(state);
}
