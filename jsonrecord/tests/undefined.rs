use jsonrecord::{CatchAll, Json, JsonMap, Record, RecordBuilder, RecordExt, from_value};
use jsonrecord_testhelpers::setup;
use serde_json::json;

#[derive(Record, Debug, PartialEq)]
#[record(undefined = "include")]
struct Included {
    endpoint: String,
    data: JsonMap,
    #[record(catch_all)]
    catch_all: CatchAll,
}

#[derive(Record, Debug, PartialEq)]
#[record(undefined = "raise")]
struct Raised {
    endpoint: String,
    data: JsonMap,
}

#[derive(Record, Debug, PartialEq)]
#[record(undefined = "exclude")]
struct Excluded {
    endpoint: String,
    data: JsonMap,
}

#[derive(Record, Debug, PartialEq)]
#[record(undefined = "include")]
struct NoCatchAll {
    endpoint: String,
}

fn input() -> Json {
    json!({"endpoint": "e", "data": {}, "extra_key": [1, 2, 3]})
}

#[test]
fn include_collects_and_restores_unknown_keys() {
    setup();
    let included: Included = from_value(input()).unwrap();
    assert_eq!(included.endpoint, "e");
    assert_eq!(
        included.catch_all,
        Some(json!({"extra_key": [1, 2, 3]}).as_object().unwrap().clone())
    );
    assert_eq!(included.to_value().unwrap(), input());
}

#[test]
fn include_merges_an_explicit_catch_all_object() {
    setup();
    let included: Included = from_value(json!({
        "endpoint": "e",
        "data": {},
        "catch_all": {"kept": true},
        "loose": 1,
    }))
    .unwrap();
    let extra = included.catch_all.unwrap();
    assert_eq!(extra["kept"], true);
    assert_eq!(extra["loose"], 1);

    let err = from_value::<Included>(json!({"endpoint": "e", "data": {}, "catch_all": 3}))
        .unwrap_err();
    assert_eq!(err.code(), "jsonrecord::undefined_parameter");
}

#[test]
fn raise_rejects_unknown_keys() {
    setup();
    let err = from_value::<Raised>(input()).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::undefined_parameter");
    assert!(err.to_string().contains("extra_key"), "{err}");

    from_value::<Raised>(json!({"endpoint": "e", "data": {}})).unwrap();
}

#[test]
fn exclude_matches_decoding_the_clean_input() {
    setup();
    let dirty: Excluded = from_value(input()).unwrap();
    let clean: Excluded = from_value(json!({"endpoint": "e", "data": {}})).unwrap();
    assert_eq!(dirty, clean);
}

#[test]
fn include_needs_a_catch_all_field() {
    setup();
    let err = from_value::<NoCatchAll>(json!({"endpoint": "e"})).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::undefined_parameter");
}

#[test]
fn builder_binds_positional_and_keyword_arguments() {
    setup();
    let built = RecordBuilder::<Included>::new()
        .arg("e")
        .arg(json!({}))
        .arg(5)
        .kwarg("other", true)
        .build()
        .unwrap();
    assert_eq!(built.endpoint, "e");
    let extra = built.catch_all.unwrap();
    assert_eq!(extra["_UNKNOWN0"], 5);
    assert_eq!(extra["other"], true);

    let built = Excluded::builder()
        .kwarg("data", json!({"k": 1}))
        .arg("e")
        .arg("dropped")
        .kwarg("ignored", 0)
        .build()
        .unwrap();
    assert_eq!(built.endpoint, "e");
    assert_eq!(built.data["k"], 1);
}

#[test]
fn builder_rejects_unbound_arguments_under_raise() {
    setup();
    let err = Raised::builder()
        .arg("e")
        .arg(json!({}))
        .kwarg("stray", 1)
        .build()
        .unwrap_err();
    assert_eq!(err.code(), "jsonrecord::unexpected_argument");

    let err = Raised::builder()
        .arg("e")
        .kwarg("endpoint", "twice")
        .build()
        .unwrap_err();
    assert_eq!(err.code(), "jsonrecord::unexpected_argument");
}
