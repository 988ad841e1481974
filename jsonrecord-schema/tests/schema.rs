use jsonrecord_core::{Config, Json, Undefined};
use jsonrecord_macros::Record;
use jsonrecord_schema::{CustomField, FieldKind, Schema, SchemaError};
use jsonrecord_testhelpers::setup;
use serde_json::json;

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Record, Debug, Clone, Copy, PartialEq)]
#[record(crate = ::jsonrecord_core, letter_case = "snake_case")]
enum Color {
    Red,
    Green,
}

/// A named polygon.
#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Shape {
    name: String,
    color: Color,
    points: Vec<Point>,
    /// Shown next to the shape
    #[record(default)]
    label: Option<String>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Tree {
    value: i64,
    #[record(default)]
    children: Vec<Tree>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core, undefined = "raise")]
struct Strict {
    id: i64,
}

fn even() -> CustomField {
    CustomField::of(FieldKind::Int).validate(|value| match value.as_i64() {
        Some(n) if n % 2 == 0 => Ok(()),
        _ => Err("Must be even.".to_string()),
    })
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Counter {
    #[record(schema_field = even)]
    count: i64,
    total: i64,
}

fn positive() -> CustomField {
    CustomField::new().validate(|value| match value.as_i64() {
        Some(n) if n > 0 => Ok(()),
        _ => Err("Must be positive.".to_string()),
    })
}

fn messages(errors: &jsonrecord_schema::ValidationErrors, path: &str) -> Vec<String> {
    errors.get(path).map(<[String]>::to_vec).unwrap_or_default()
}

#[test]
fn missing_required_fields_are_reported() {
    setup();
    let errors = Schema::<Point>::new().validate(&json!({})).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(messages(&errors, "$.x"), ["Missing data for required field."]);
    assert_eq!(messages(&errors, "$.y"), ["Missing data for required field."]);
}

#[test]
fn defaults_and_optionals_are_not_required() {
    setup();
    let schema = Schema::<Shape>::new();
    let label = schema.field("label").unwrap();
    assert!(!label.required);
    assert!(label.allow_none);
    assert_eq!(label.default, Some(Json::Null));

    let name = schema.field("name").unwrap();
    assert!(name.required);
    assert!(!name.allow_none);

    schema
        .validate(&json!({"name": "tri", "color": "red", "points": []}))
        .unwrap();
}

#[test]
fn enum_membership_is_checked() {
    setup();
    let errors = Schema::<Shape>::new()
        .validate(&json!({"name": "tri", "color": "blue", "points": []}))
        .unwrap_err();
    let color = messages(&errors, "$.color");
    assert_eq!(color.len(), 1);
    assert!(color[0].starts_with("Must be one of:"), "{color:?}");
    assert!(color[0].contains("\"green\""));
}

#[test]
fn nested_errors_carry_their_path() {
    setup();
    let errors = Schema::<Shape>::new()
        .validate(&json!({
            "name": 3,
            "color": "green",
            "points": [{"x": 1, "y": "2"}, {"x": 1}],
        }))
        .unwrap_err();
    assert_eq!(messages(&errors, "$.name"), ["Not a valid string."]);
    assert_eq!(messages(&errors, "$.points[0].y"), ["Not a valid integer."]);
    assert_eq!(
        messages(&errors, "$.points[1].y"),
        ["Missing data for required field."]
    );
}

#[test]
fn null_is_rejected_for_plain_fields() {
    setup();
    let errors = Schema::<Point>::new()
        .validate(&json!({"x": null, "y": 1}))
        .unwrap_err();
    assert_eq!(messages(&errors, "$.x"), ["Field may not be null."]);
}

#[test]
fn unknown_keys_follow_the_record_policy() {
    setup();
    let errors = Schema::<Strict>::new()
        .validate(&json!({"id": 1, "extra": true}))
        .unwrap_err();
    assert_eq!(messages(&errors, "$.extra"), ["Unknown field."]);

    let strict = Schema::<Strict>::new()
        .unknown(Undefined::Exclude)
        .load(json!({"id": 1, "extra": true}))
        .unwrap();
    assert_eq!(strict, Strict { id: 1 });

    let errors = Schema::<Point>::new()
        .unknown(Undefined::Raise)
        .validate(&json!({"x": 1, "y": 2, "z": 3}))
        .unwrap_err();
    assert_eq!(messages(&errors, "$.z"), ["Unknown field."]);
}

#[test]
fn recursion_limit_bounds_nesting() {
    setup();
    let doc = json!({"value": 1, "children": [{"value": 2, "children": [{"value": 3}]}]});

    Schema::<Tree>::new().validate(&doc).unwrap();

    let errors = Schema::<Tree>::new()
        .recursion_limit(1)
        .validate(&doc)
        .unwrap_err();
    let deep = messages(&errors, "$.children[0].children[0]");
    assert_eq!(deep.len(), 1);
    assert!(deep[0].starts_with("Schema recursion limit exceeded"));

    let tree = Tree {
        value: 1,
        children: vec![Tree {
            value: 2,
            children: vec![Tree {
                value: 3,
                children: vec![],
            }],
        }],
    };
    let err = Schema::<Tree>::new()
        .recursion_limit(1)
        .dump(&tree)
        .unwrap_err();
    let errors = err.validation().unwrap();
    assert!(errors.get("$.children[0].children[0]").is_some());

    assert_eq!(
        Schema::<Tree>::new().dump(&tree).unwrap(),
        json!({"value": 1, "children": [{"value": 2, "children": [{"value": 3, "children": []}]}]})
    );
}

#[test]
fn field_schema_override_beats_the_global_one() {
    setup();
    let config = Config::new().schema_field::<i64>(positive());
    let schema = Schema::<Counter>::with_config(config);

    // `count` carries its own field, `total` gets the global one
    schema.validate(&json!({"count": -2, "total": 1})).unwrap();

    let errors = schema
        .validate(&json!({"count": 3, "total": -1}))
        .unwrap_err();
    assert_eq!(messages(&errors, "$.count"), ["Must be even."]);
    assert_eq!(messages(&errors, "$.total"), ["Must be positive."]);
}

#[test]
fn custom_fields_transform_on_load_and_dump() {
    setup();
    let hex = CustomField::new()
        .deserialize(|value| match value {
            Json::String(s) => i64::from_str_radix(&s, 16)
                .map(Json::from)
                .map_err(|_| "Not a valid hex number.".to_string()),
            other => Ok(other),
        })
        .serialize(|value| match value.as_i64() {
            Some(n) => Ok(Json::from(format!("{n:x}"))),
            None => Err("Not a valid integer.".to_string()),
        });
    let schema = Schema::<Point>::with_config(Config::new().schema_field::<i64>(hex));

    let point = schema.load(json!({"x": "ff", "y": 1})).unwrap();
    assert_eq!(point, Point { x: 255, y: 1 });
    assert_eq!(schema.dump(&point).unwrap(), json!({"x": "ff", "y": "1"}));

    let err = schema.load(json!({"x": "zz", "y": 1})).unwrap_err();
    assert_eq!(
        messages(err.validation().unwrap(), "$.x"),
        ["Not a valid hex number."]
    );
}

#[test]
fn selection_options_shape_load_and_dump() {
    setup();
    let point = Point { x: 1, y: 2 };

    let dumped = Schema::<Point>::new().load_only(["y"]).dump(&point).unwrap();
    assert_eq!(dumped, json!({"x": 1}));

    let dumped = Schema::<Point>::new().only(["x"]).dump(&point).unwrap();
    assert_eq!(dumped, json!({"x": 1}));

    let fields = Schema::<Shape>::new().exclude(["label"]).fields();
    let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["name", "color", "points"]);

    // a dump-only field is not read, so it must not be required either
    Schema::<Point>::new()
        .dump_only(["y"])
        .validate(&json!({"x": 1}))
        .unwrap();
}

#[test]
fn partial_skips_missing_fields() {
    setup();
    let schema = Schema::<Point>::new().partial(true);
    schema.validate(&json!({"x": 1})).unwrap();

    let shape = Schema::<Shape>::new()
        .partial(true)
        .load(json!({"name": "tri", "color": "red", "points": []}))
        .unwrap();
    assert_eq!(shape.label, None);
}

#[test]
fn many_documents_are_indexed() {
    setup();
    let schema = Schema::<Point>::new();

    let points = schema
        .loads_many(r#"[{"x": 1, "y": 2}, {"x": 3, "y": 4}]"#)
        .unwrap();
    assert_eq!(points, [Point { x: 1, y: 2 }, Point { x: 3, y: 4 }]);

    let err = schema
        .load_many(json!([{"x": 1, "y": 2}, {"x": "3", "y": 4}]))
        .unwrap_err();
    let errors = err.validation().unwrap();
    assert_eq!(messages(errors, "$[1].x"), ["Not a valid integer."]);

    assert_eq!(
        schema.dumps_many(&points).unwrap(),
        r#"[{"x":1,"y":2},{"x":3,"y":4}]"#
    );
    assert!(matches!(
        schema.loads("{not json"),
        Err(SchemaError::Decode(_))
    ));
}

#[test]
fn json_schema_export_uses_defs_for_nested_records() {
    setup();
    let doc = Schema::<Shape>::new().to_json_schema().unwrap();

    assert_eq!(doc["$schema"], "https://json-schema.org/draft/2020-12/schema");
    assert_eq!(doc["title"], "Shape");
    assert_eq!(doc["description"], "A named polygon.");
    assert_eq!(doc["type"], "object");
    assert_eq!(doc["required"], json!(["name", "color", "points"]));
    assert_eq!(doc["properties"]["name"], json!({"type": "string"}));
    assert_eq!(doc["properties"]["color"], json!({"enum": ["red", "green"]}));
    assert_eq!(
        doc["properties"]["points"],
        json!({"type": "array", "items": {"$ref": "#/$defs/Point"}})
    );
    assert_eq!(
        doc["properties"]["label"],
        json!({
            "description": "Shown next to the shape",
            "anyOf": [{"type": "string"}, {"type": "null"}],
            "default": null,
        })
    );
    assert_eq!(doc["$defs"]["Point"]["required"], json!(["x", "y"]));
    assert_eq!(
        doc["$defs"]["Point"]["properties"]["x"],
        json!({"type": "integer"})
    );
}

#[test]
fn json_schema_export_of_recursive_and_strict_records() {
    setup();
    let tree = Schema::<Tree>::new().to_json_schema().unwrap();
    assert_eq!(tree["properties"]["children"]["items"], json!({"$ref": "#"}));
    assert!(tree.get("$defs").is_none());

    let strict = Schema::<Strict>::new().to_json_schema().unwrap();
    assert_eq!(strict["additionalProperties"], json!(false));
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Note {
    title: String,
    body: Option<String>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
struct Notebook {
    notes: Vec<Note>,
    pinned: Option<Note>,
}

#[test]
fn optional_fields_without_defaults_load_as_none() {
    setup();
    let schema = Schema::<Note>::new();
    assert!(!schema.field("body").unwrap().required);

    let note = schema.load(json!({"title": "t"})).unwrap();
    assert_eq!(
        note,
        Note {
            title: "t".into(),
            body: None
        }
    );

    let notebook = Schema::<Notebook>::new()
        .load(json!({"notes": [{"title": "a"}, {"title": "b", "body": "x"}]}))
        .unwrap();
    assert_eq!(notebook.notes[0].body, None);
    assert_eq!(notebook.notes[1].body.as_deref(), Some("x"));
    assert_eq!(notebook.pinned, None);
}
