use zfs_resource::adapters::MemoryEngine;
use zfs_resource::namespace::nest;
use zfs_resource::types::{QueryRequest, ResourceNode};

use crate::common::harness;

fn node(name: &str) -> ResourceNode {
    ResourceNode {
        name: name.into(),
        pool: name.split('/').next().unwrap_or(name).into(),
        ..ResourceNode::default()
    }
}

fn shape(n: &ResourceNode) -> String {
    if n.children.is_empty() {
        n.name.clone()
    } else {
        let kids: Vec<String> = n.children.iter().map(shape).collect();
        format!("{}[{}]", n.name, kids.join(","))
    }
}

#[test]
fn nested_query_builds_tree_from_pool_root() {
    let h = harness(
        MemoryEngine::new()
            .with_dataset("tank/a/b")
            .with_dataset("tank/c"),
    );
    let roots = h
        .api
        .query(QueryRequest::new(["tank"]).get_children(true).nest_results(true))
        .expect("query")
        .into_nested()
        .expect("nested");
    assert_eq!(roots.len(), 1);
    assert!(roots[0].is_pool_root());
    assert_eq!(shape(&roots[0]), "tank[tank/a[tank/a/b],tank/c]");
    assert!(roots[0].find("tank/a/b").is_some());
}

#[test]
fn nesting_is_independent_of_input_order() {
    let names = ["tank", "tank/a", "tank/a/b", "tank/c"];
    let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];
    for order in orders {
        let flat: Vec<ResourceNode> = order.iter().map(|&i| node(names[i])).collect();
        let roots = nest(flat);
        assert_eq!(roots.len(), 1, "{order:?}");
        let root = &roots[0];
        assert_eq!(root.name, "tank");
        let a = root.find("tank/a").expect("tank/a nested");
        assert_eq!(a.children.len(), 1);
        assert_eq!(a.children[0].name, "tank/a/b");
        assert!(root.children.iter().any(|c| c.name == "tank/c"));
        assert_eq!(root.children.len(), 2);
    }
}

#[test]
fn records_without_parent_become_roots() {
    let roots = nest(vec![node("tank/a/b"), node("tank/x"), node("tank/a/b/c")]);
    let shapes: Vec<String> = roots.iter().map(shape).collect();
    assert_eq!(shapes, vec!["tank/a/b[tank/a/b/c]", "tank/x"]);
}
