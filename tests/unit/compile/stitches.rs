use super::*;

fn action(total: i64) -> Element {
    Element::new("action")
        .with_attr("name", "knit")
        .with_attr("total", total.to_string())
}

fn repeat(count: i64, body: Vec<Element>) -> Element {
    Element::new("repeat")
        .with_attr("count", count.to_string())
        .with_children(body)
}

#[test]
fn actions_and_repeats_are_counted() {
    let nodes = vec![
        action(3),
        repeat(4, vec![action(2), action(1)]),
        Element::new("text").with_attr("data", "k to end"),
        Element::new("image").with_attr("name", "logo"),
    ];
    assert_eq!(stitch_count(&nodes).unwrap(), 3 + 4 * 3);
    assert_eq!(stitch_count(&Vec::<Element>::new()).unwrap(), 0);
}

#[test]
fn nested_repeats_multiply() {
    let nodes = vec![repeat(2, vec![repeat(3, vec![action(5)]), action(1)])];
    assert_eq!(stitch_count(&nodes).unwrap(), 2 * (3 * 5 + 1));
}

#[test]
fn count_is_additive_over_concatenation() {
    let a = vec![action(7), repeat(2, vec![action(3)])];
    let b = vec![repeat(5, vec![action(1), action(0)]), action(4)];
    let joined: Vec<Element> = a.iter().chain(&b).cloned().collect();
    assert_eq!(
        stitch_count(&joined).unwrap(),
        stitch_count(&a).unwrap() + stitch_count(&b).unwrap()
    );
}

#[test]
fn bad_totals_are_rejected() {
    let nodes = vec![Element::new("action").with_attr("total", "two")];
    assert!(matches!(stitch_count(&nodes), Err(OpafError::Stitch(_))));
}

#[test]
fn row_ids_are_sequential_and_nested() {
    let mut nodes: Vec<Node> = vec![
        Element::new("row").into(),
        repeat(2, vec![Element::new("row"), Element::new("row")]).into(),
        Element::new("text").into(),
        Element::new("row").into(),
    ];
    assert_eq!(assign_row_ids(&mut nodes, 0), 4);

    let ids: Vec<String> = collect_ids(&nodes);
    assert_eq!(ids, ["1", "2", "3", "4"]);
}

fn collect_ids(nodes: &[Node]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        if let Node::Element(el) = node {
            if let Some(id) = el.attr("id") {
                out.push(id.to_owned());
            }
            out.extend(collect_ids(&el.children));
        }
    }
    out
}

#[test]
fn chart_tag_reaches_nested_actions() {
    let mut nodes = vec![action(1), repeat(2, vec![action(2)])];
    tag_chart(&mut nodes, "border", 3);
    assert_eq!(nodes[0].attr("chart"), Some("border:3"));
    assert_eq!(nodes[1].attr("chart"), None);
    assert_eq!(
        nodes[1].elements().next().and_then(|e| e.attr("chart")),
        Some("border:3")
    );
}
