//! Round-trip and cycle properties over generated graphs.

use depgraph::{CycleFinder, DirectedGraph, Node};
use proptest::prelude::*;

/// Optional label and optional `style` attribute of a generated node.
type NodeSpec = (Option<String>, Option<String>);

fn arb_graph() -> impl Strategy<Value = DirectedGraph> {
    let name = "[a-zA-Z0-9 _.<>/-]{0,16}";
    let label = proptest::option::of("[a-zA-Z0-9 _.,<>/\\[\\]-]{0,12}");
    let extra = proptest::option::of("[a-z0-9 ,]{0,8}");
    let nodes = proptest::collection::vec((label, extra), 0..12);

    (name, nodes).prop_flat_map(|(name, nodes): (String, Vec<NodeSpec>)| {
        let count = nodes.len();
        let edges = if count == 0 {
            proptest::collection::vec((0..1usize, 0..1usize), 0..1).boxed()
        } else {
            proptest::collection::vec((0..count, 0..count), 0..count * 3).boxed()
        };
        (Just(name), Just(nodes), edges).prop_map(|(name, nodes, edges)| {
            let mut graph = DirectedGraph::with_name(name).unwrap();
            for (i, (label, extra)) in nodes.iter().enumerate() {
                let mut node = Node::new(format!("n{}", i));
                if let Some(label) = label {
                    node = node.with_attribute("label", label.clone());
                }
                if let Some(extra) = extra {
                    node = node.with_attribute("style", extra.clone());
                }
                graph.add_node(node).unwrap();
            }
            for (from, to) in edges {
                if from < nodes.len() && to < nodes.len() {
                    graph
                        .add_edge(format!("n{}", from), format!("n{}", to))
                        .unwrap();
                }
            }
            graph
        })
    })
}

proptest! {
    #[test]
    fn serialize_parse_serialize_is_stable(graph in arb_graph()) {
        let text = graph.to_dot();
        let parsed = DirectedGraph::from_dot(&text).unwrap();
        prop_assert_eq!(parsed.to_dot(), text);
        prop_assert_eq!(parsed.node_count(), graph.node_count());
        prop_assert_eq!(parsed.edge_count(), graph.edge_count());
    }

    #[test]
    fn witnesses_are_real_cycles(graph in arb_graph()) {
        for (start, witnesses) in CycleFinder::new(&graph).find_cycles_in_graph() {
            for witness in witnesses {
                prop_assert_eq!(witness.start(), Some(start.as_str()));
                for pair in witness.nodes.windows(2) {
                    prop_assert!(graph.contains_edge(&pair[0], &pair[1]));
                }
                let last = witness.nodes.last().unwrap();
                prop_assert!(graph.contains_edge(last, &start));
            }
        }
    }

    #[test]
    fn witnesses_exist_exactly_when_graph_is_cyclic(graph in arb_graph()) {
        let any_witness = graph.find_cycles().values().any(|w| !w.is_empty());
        prop_assert_eq!(any_witness, graph.has_cycles());
    }

    #[test]
    fn removal_leaves_no_dangling_edges(graph in arb_graph(), pick in any::<prop::sample::Index>()) {
        let mut graph = graph;
        let ids: Vec<String> = graph.nodes().iter().map(|n| n.id().to_string()).collect();
        prop_assume!(!ids.is_empty());
        let victim = pick.get(&ids).clone();

        graph.remove_node(&victim).unwrap();

        prop_assert!(graph.get_node(&victim).is_none());
        for (from, to) in graph.edges() {
            prop_assert!(from.id() != victim && to.id() != victim);
        }
        let reparsed = DirectedGraph::from_dot(&graph.to_dot()).unwrap();
        prop_assert_eq!(reparsed.node_count(), ids.len() - 1);
    }
}

#[test]
fn two_node_example_parses() {
    let graph =
        DirectedGraph::from_dot("digraph \"g\" {\n  a [label=\"A\"];\n  b [label=\"B\"];\n  a -> b;\n}")
            .unwrap();

    assert_eq!(graph.name(), Some("g"));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.contains_edge("a", "b"));
}
