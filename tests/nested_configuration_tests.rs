use exclaim::{component, helper, Bind, Component, Helper, Map, Node, Registry, Ui, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn map(entries: Vec<(&str, Node)>) -> Node {
    Node::Map(
        entries
            .into_iter()
            .map(|(key, node)| (key.to_string(), node))
            .collect(),
    )
}

fn literal(value: serde_json::Value) -> Node {
    Node::Scalar(value)
}

fn int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        _ => 0,
    }
}

fn render(root: Component, env: serde_json::Value) -> String {
    let mut ui = Ui::new(Registry::default());
    ui.set_parsed_ui(root);
    ui.render(&Value::from(env)).unwrap().to_string()
}

fn summary_component() -> Component {
    Component::new(
        "cmp",
        component(|config, _env, _render_child| {
            let hash = config.get("top_level_hash").cloned().unwrap_or_default();
            let array = hash.get("array_key").cloned().unwrap_or_default().into_items();
            Ok(Value::from(format!(
                "Top-level value: {} / Outer hash value: {} / Nested array value: {} / Inner hash value: {}",
                config.get("top_level_scalar").cloned().unwrap_or_default(),
                hash.get("outer_key").cloned().unwrap_or_default(),
                array[0],
                array[1].get("inner_key").cloned().unwrap_or_default(),
            )))
        }),
    )
}

/// `<ul>` of rendered `list_items`, numbering each child through `n` in the
/// environment handed to it, starting at `start_index` (default 1).
fn list_component() -> Component {
    Component::new(
        "list",
        component(|config, env, render_child| {
            let start = match config.get("start_index") {
                Some(value) => int(Some(value)),
                None => 1,
            };
            let items = config.get("list_items").cloned().unwrap_or_default().into_items();

            let mut lines = Vec::with_capacity(items.len());
            for (offset, item) in items.iter().enumerate() {
                let mut scope = env.as_object().cloned().unwrap_or_else(Map::new);
                scope.insert("n".to_string(), Value::from(start + offset as i64));
                let rendered = render_child(item, &Value::Object(scope))?;
                lines.push(format!("  <li>{}</li>", rendered));
            }
            Ok(Value::from(format!("<ul>\n{}\n</ul>\n", lines.join("\n"))))
        }),
    )
}

fn numbered_item() -> Component {
    Component::new(
        "item",
        component(|_config, env, _render_child| {
            Ok(Value::from(format!("Item {}", env.get("n").cloned().unwrap_or_default())))
        }),
    )
}

#[test]
fn test_handles_nested_literals() {
    let root = summary_component().with_config(map(vec![
        ("top_level_scalar", literal(json!("1"))),
        (
            "top_level_hash",
            map(vec![
                ("outer_key", literal(json!("2"))),
                (
                    "array_key",
                    Node::Sequence(vec![
                        literal(json!("3")),
                        map(vec![("inner_key", literal(json!("4")))]),
                    ]),
                ),
            ]),
        ),
    ]));

    assert_eq!(
        render(root, json!(null)),
        "Top-level value: 1 / Outer hash value: 2 / Nested array value: 3 / Inner hash value: 4"
    );
}

#[test]
fn test_handles_nested_helpers_and_binds() {
    let add_one = Helper::new(
        "add_one",
        helper(|config, _env| Ok(Value::from(1 + int(config.get("addend"))))),
    )
    .with_config(map(vec![("addend", literal(json!(1)))]));
    let quadruple = Helper::new(
        "quadruple",
        helper(|config, _env| Ok(Value::from(int(config.get("multiplicand")) * 4))),
    )
    .with_config(map(vec![(
        "multiplicand",
        Node::Bind(Bind::new("value.to.quadruple")),
    )]));

    let root = summary_component().with_config(map(vec![
        ("top_level_scalar", literal(json!("1"))),
        (
            "top_level_hash",
            map(vec![
                ("outer_key", Node::from(add_one)),
                (
                    "array_key",
                    Node::Sequence(vec![
                        Node::Bind(Bind::new("array.3")),
                        map(vec![("inner_key", Node::from(quadruple))]),
                    ]),
                ),
            ]),
        ),
    ]));

    let env = json!({
        "array": [0, 1, 2, 3],
        "value": { "to": { "quadruple": 1 } }
    });
    assert_eq!(
        render(root, env),
        "Top-level value: 1 / Outer hash value: 2 / Nested array value: 3 / Inner hash value: 4"
    );
}

#[test]
fn test_mixed_children_are_rendered_or_passed_through() {
    let item_helper = Helper::new(
        "item_helper",
        helper(|config, _env| Ok(Value::from(format!("Item {}", int(config.get("helper_n")))))),
    )
    .with_config(map(vec![("helper_n", literal(json!(3)))]));

    let root = list_component().with_config(map(vec![(
        "list_items",
        Node::Sequence(vec![
            Node::from(numbered_item()),
            literal(json!("Item 2")),
            Node::from(item_helper),
        ]),
    )]));

    assert_eq!(
        render(root, json!({})),
        "<ul>\n  <li>Item 1</li>\n  <li>Item 2</li>\n  <li>Item 3</li>\n</ul>\n"
    );
}

#[test]
fn test_helper_can_choose_between_child_components() {
    let greeting = component(|config, _env, _render_child| {
        Ok(Value::from(format!(
            "{}, {}",
            config.get("greeting").cloned().unwrap_or_default(),
            config.get("name").cloned().unwrap_or_default()
        )))
    });
    let greet = |name: &str| {
        Component::new("greeting", greeting.clone()).with_config(map(vec![
            ("greeting", Node::Bind(Bind::new("greeting_text"))),
            ("name", literal(json!(name))),
        ]))
    };
    let choose = Helper::new(
        "if",
        helper(|config, _env| {
            let branch = if config.get("if_condition").is_some_and(Value::is_truthy) {
                "then_component"
            } else {
                "else_component"
            };
            Ok(config.get(branch).cloned().unwrap_or_default())
        }),
    )
    .with_config(map(vec![
        ("if_condition", Node::Bind(Bind::new("before_noon"))),
        ("then_component", Node::from(greet("Sun"))),
        ("else_component", Node::from(greet("Moon"))),
    ]));

    let root = list_component().with_config(map(vec![(
        "list_items",
        Node::Sequence(vec![Node::from(choose)]),
    )]));

    let mut ui = Ui::new(Registry::default());
    ui.set_parsed_ui(root);

    let morning = Value::from(json!({ "before_noon": true, "greeting_text": "Good morning" }));
    assert_eq!(
        ui.render(&morning).unwrap().to_string(),
        "<ul>\n  <li>Good morning, Sun</li>\n</ul>\n"
    );
    let evening = Value::from(json!({ "before_noon": false, "greeting_text": "Good evening" }));
    assert_eq!(
        ui.render(&evening).unwrap().to_string(),
        "<ul>\n  <li>Good evening, Moon</li>\n</ul>\n"
    );
}

#[test]
fn test_children_see_the_environment_their_parent_builds() {
    let root = list_component().with_config(map(vec![(
        "list_items",
        Node::Sequence(vec![
            Node::from(numbered_item()),
            Node::from(numbered_item()),
            Node::from(numbered_item()),
        ]),
    )]));

    assert_eq!(
        render(root, json!({ "n": 1 })),
        "<ul>\n  <li>Item 1</li>\n  <li>Item 2</li>\n  <li>Item 3</li>\n</ul>\n"
    );
}

#[test]
fn test_recursively_renders_with_parent_provided_environment() {
    let intermediate = list_component().with_config(map(vec![
        ("start_index", literal(json!(7))),
        (
            "list_items",
            Node::Sequence(vec![
                Node::from(numbered_item()),
                Node::from(numbered_item()),
            ]),
        ),
    ]));
    let root = list_component().with_config(map(vec![
        ("start_index", literal(json!(1))),
        (
            "list_items",
            Node::Sequence(vec![
                Node::from(numbered_item()),
                Node::from(numbered_item()),
                Node::from(intermediate),
            ]),
        ),
    ]));

    let expected = "<ul>
  <li>Item 1</li>
  <li>Item 2</li>
  <li><ul>
  <li>Item 7</li>
  <li>Item 8</li>
</ul>
</li>
</ul>
";
    assert_eq!(render(root, json!({ "n": 1 })), expected);
}
