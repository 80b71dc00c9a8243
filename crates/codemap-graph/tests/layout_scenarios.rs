use codemap_core::{Document, FileId, ItemId, ReferenceDescriptor, SymbolRecord};
use codemap_graph::{LayoutConfig, LayoutEngine, LayoutOutput, PositionOverrides, Vec2};
use serde_json::json;

fn layout_json(value: serde_json::Value) -> anyhow::Result<LayoutOutput> {
    let document = Document::from_value(value)?;
    Ok(LayoutEngine::default().layout(&document, &PositionOverrides::new()))
}

#[test]
fn test_two_files_connect_and_sit_side_by_side() -> anyhow::Result<()> {
    let output = layout_json(json!({
        "files": {
            "a.py": {"foo": {"args": [], "start_line": 1, "end_line": 2}},
            "b.py": {"bar": {"used_functions": {"foo": "a"}}}
        }
    }))?;
    let layout = &output.layout;

    assert_eq!(layout.connections.len(), 1);
    let plan = &layout.connections[0];
    assert_eq!(plan.source.item_id, ItemId::new(FileId(1), "bar"));
    assert_eq!(plan.target.item_id, ItemId::new(FileId(0), "foo"));

    let a = layout.file_by_path("a.py").expect("a.py laid out");
    let b = layout.file_by_path("b.py").expect("b.py laid out");
    assert_eq!(a.grid.chebyshev_distance(b.grid), 1);

    let margin = LayoutConfig::default().canvas_margin;
    for file in &layout.file_boxes {
        assert!(file.position.x + file.size.x + margin <= layout.canvas_bounds.width);
        assert!(file.position.y + file.size.y + margin <= layout.canvas_bounds.height);
    }
    Ok(())
}

#[test]
fn test_module_suffix_beats_decoy() -> anyhow::Result<()> {
    let output = layout_json(json!({
        "files": {
            "c.py": {"foo": {}},
            "a.py": {"foo": {}},
            "b.py": {"bar": {"used_functions": {"foo": "x.y.a"}}}
        },
        "file_meta": {"c.py": {"module": "z"}}
    }))?;

    let plan = &output.layout.connections[0];
    assert_eq!(plan.target.file_path, "a.py");
    assert_eq!(plan.target.item_id, ItemId::new(FileId(1), "foo"));
    Ok(())
}

#[test]
fn test_keyword_only_hint_resolves_to_first_definition() -> anyhow::Result<()> {
    let output = layout_json(json!({
        "files": {
            "a.py": {"foo": {}},
            "lib/fromage.py": {"foo": {}},
            "b.py": {"bar": {"used_functions": {"foo": "from "}}}
        }
    }))?;

    let plan = &output.layout.connections[0];
    assert_eq!(plan.target.file_path, "a.py");
    assert_eq!(output.graph.files[2].items[0].references[0].module_hint, "");
    Ok(())
}

#[test]
fn test_duplicate_references_fan_out() {
    let mut document = Document::new();
    document.insert_symbol("a.py", "foo", SymbolRecord::function(&[]));
    document.insert_symbol(
        "b.py",
        "bar",
        SymbolRecord::function(&[])
            .with_reference("foo", ReferenceDescriptor::Module("a".into()))
            .with_reference("a.foo", ReferenceDescriptor::Module("a".into())),
    );

    let output = LayoutEngine::default().layout(&document, &PositionOverrides::new());
    let connections = &output.layout.connections;

    assert_eq!(connections.len(), 2);
    assert_eq!(connections[0].occurrence, 0);
    assert_eq!(connections[1].occurrence, 1);
    assert_eq!(connections[0].offset, 0.0);
    assert_ne!(connections[1].offset, 0.0);
    assert_ne!(connections[0].id, connections[1].id);
    assert_eq!(connections[1].label, "bar -> a.foo");
}

#[test]
fn test_stronger_edges_sit_closer() -> anyhow::Result<()> {
    let output = layout_json(json!({
        "files": {
            "p.py": {
                "p1": {"used_functions": {"q1": "q", "q2": "q", "q3": "q", "r1": "r"}}
            },
            "q.py": {"q1": {}, "q2": {}, "q3": {}},
            "r.py": {"r1": {}},
            "s.py": {"s1": {"used_functions": {"r1": "r"}}}
        }
    }))?;
    let layout = &output.layout;
    let cell = |path: &str| layout.file_by_path(path).map(|f| f.grid);

    let (p, q, r) = (cell("p.py").unwrap(), cell("q.py").unwrap(), cell("r.py").unwrap());
    assert!(p.chebyshev_distance(q) <= p.chebyshev_distance(r));
    assert_eq!(output.graph.edge_weight(FileId(0), FileId(1)), 3);
    Ok(())
}

#[test]
fn test_empty_input_yields_minimum_canvas() -> anyhow::Result<()> {
    let output = layout_json(json!({}))?;
    let config = LayoutConfig::default();

    assert!(output.layout.file_boxes.is_empty());
    assert!(output.layout.connections.is_empty());
    assert_eq!(output.layout.canvas_bounds.width, config.min_canvas_width);
    assert_eq!(output.layout.canvas_bounds.height, config.min_canvas_height);
    Ok(())
}

#[test]
fn test_override_moves_box_and_connection_endpoints() -> anyhow::Result<()> {
    let value = json!({
        "files": {
            "a.py": {"foo": {}},
            "b.py": {"bar": {"used_functions": {"foo": "a"}}}
        }
    });
    let engine = LayoutEngine::default();
    let document = Document::from_value(value)?;
    let mut output = engine.layout(&document, &PositionOverrides::new());

    let mut overrides = PositionOverrides::new();
    overrides.set("a.py", Vec2::new(1500.0, 900.0));
    engine.apply_overrides(&mut output, &overrides);

    let a = output.layout.file_by_path("a.py").expect("a.py laid out");
    assert_eq!(a.position, Vec2::new(1500.0, 900.0));

    let plan = &output.layout.connections[0];
    let foo = &a.items[0];
    assert_eq!(plan.target.point.y, 900.0 + foo.position.y + foo.size.y / 2.0);
    assert_eq!(plan.path.end(), plan.target.point);
    assert!(output.layout.canvas_bounds.width >= 1500.0 + a.size.x);
    Ok(())
}

#[test]
fn test_layout_serializes_for_rendering() -> anyhow::Result<()> {
    let output = layout_json(json!({
        "files": {
            "a.py": {"foo": {}},
            "b.py": {"bar": {"used_functions": {"foo": "a"}}}
        }
    }))?;
    let value = serde_json::to_value(&output.layout)?;

    assert!(value["fileBoxes"].is_array());
    assert_eq!(value["connections"][0]["id"], "file-1::bar->file-0::foo#0");
    assert_eq!(value["connections"][0]["path"]["kind"], "cubic");
    assert_eq!(value["connections"][0]["source"]["side"], "right");
    assert!(value["canvasBounds"]["width"].is_number());
    Ok(())
}

#[test]
fn test_custom_config_changes_geometry() -> anyhow::Result<()> {
    let config: LayoutConfig = serde_json::from_str(r#"{"canvas_margin": 10.0}"#)?;
    let document = Document::from_value(json!({"files": {"a.py": {"foo": {}}}}))?;
    let output = LayoutEngine::new(config).layout(&document, &PositionOverrides::new());

    assert_eq!(output.layout.file_boxes[0].position, Vec2::new(10.0, 10.0));
    Ok(())
}
