use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use jsonrecord::{Config, Input, Json, Record, RecordExt, SetOrder, decode_input, from_str, to_string, to_value};
use jsonrecord_testhelpers::setup;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

#[derive(Record, Debug, Clone, Copy, PartialEq)]
#[record(letter_case = "snake_case")]
enum Status {
    Active,
    Retired,
}

#[derive(Record, Debug, Clone, Copy, PartialEq)]
enum Level {
    #[record(value = 1)]
    Low,
    #[record(value = 2)]
    High,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Inner {
    label: String,
}

#[derive(Record, Debug, Clone, PartialEq)]
enum IntOrText {
    Int(i64),
    Text(String),
}

#[derive(Record, Debug, Clone, PartialEq)]
struct UserId(u64);

#[derive(Record, Debug, Clone, PartialEq)]
struct Everything {
    id: UserId,
    maybe: Option<i32>,
    list: Vec<Inner>,
    set: BTreeSet<String>,
    deque: VecDeque<u8>,
    pair: (i32, String),
    map: BTreeMap<String, f64>,
    int_keys: HashMap<u32, bool>,
    ordered: IndexMap<String, Option<Inner>>,
    status: Status,
    level: Level,
    nested: Inner,
    either: IntOrText,
    when: DateTime<Utc>,
    price: Decimal,
    uuid: Uuid,
    raw: Json,
}

fn everything() -> Everything {
    let mut ordered = IndexMap::new();
    ordered.insert("z".to_string(), Some(Inner { label: "last".into() }));
    ordered.insert("a".to_string(), None);

    Everything {
        id: UserId(7),
        maybe: None,
        list: vec![Inner { label: "one".into() }, Inner { label: "two".into() }],
        set: ["b", "a"].into_iter().map(String::from).collect(),
        deque: VecDeque::from([3, 1, 2]),
        pair: (1, "a".into()),
        map: BTreeMap::from([("half".to_string(), 0.5)]),
        int_keys: HashMap::from([(3, true)]),
        ordered,
        status: Status::Retired,
        level: Level::High,
        nested: Inner { label: "inside".into() },
        either: IntOrText::Text("5".into()),
        when: DateTime::from_timestamp(1_600_000_000, 500_000_000).unwrap(),
        price: Decimal::new(1999, 2),
        uuid: Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8),
        raw: json!({"free": ["form", 1]}),
    }
}

#[test]
fn every_supported_shape_round_trips() {
    setup();
    let value = everything();
    let text = to_string(&value).unwrap();
    let back: Everything = from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn encoded_shapes() {
    setup();
    let json = to_value(&everything()).unwrap();

    assert_eq!(json["id"], 7);
    assert_eq!(json["maybe"], Json::Null);
    assert_eq!(json["list"], json!([{"label": "one"}, {"label": "two"}]));
    assert_eq!(json["deque"], json!([3, 1, 2]));
    assert_eq!(json["pair"], json!([1, "a"]));
    assert_eq!(json["int_keys"], json!({"3": true}));
    assert_eq!(
        json["ordered"].as_object().unwrap().keys().collect::<Vec<_>>(),
        ["z", "a"]
    );
    assert_eq!(json["status"], "retired");
    assert_eq!(json["level"], 2);
    assert_eq!(json["either"], "5");
    assert_eq!(json["when"], 1_600_000_000.5);
    assert_eq!(json["price"], "19.99");
    assert_eq!(json["uuid"], "67e55044-10b1-426f-9247-bb680e5fe0c8");
    assert_eq!(json["raw"], json!({"free": ["form", 1]}));
}

#[test]
fn unions_pick_the_arm_matching_the_value() {
    setup();
    assert_eq!(from_str::<IntOrText>("3").unwrap(), IntOrText::Int(3));
    assert_eq!(
        from_str::<IntOrText>("\"3\"").unwrap(),
        IntOrText::Text("3".into())
    );
    let err = from_str::<IntOrText>("[]").unwrap_err();
    assert_eq!(err.code(), "jsonrecord::no_matching_arm");
}

#[test]
fn value_enums_reject_unknown_values() {
    setup();
    let err = from_str::<Status>("\"activ\"").unwrap_err();
    assert_eq!(err.code(), "jsonrecord::invalid_enum_value");
    assert!(err.to_string().contains("active"), "{err}");

    assert_eq!(from_str::<Level>("1").unwrap(), Level::Low);
    assert!(from_str::<Level>("1.0").is_err());
}

#[test]
fn decoding_a_decoded_record_is_the_identity() {
    setup();
    let config = Config::default();
    let value = everything();

    let once = decode_input(Input::Record(value.clone()), &config).unwrap();
    assert_eq!(once, value);

    let from_json = Everything::coerce(value.to_value().unwrap(), &config).unwrap();
    let again = Everything::coerce(Input::Record(from_json.clone()), &config).unwrap();
    assert_eq!(again, from_json);
}

#[test]
fn sets_encode_in_the_configured_order() {
    setup();

    #[derive(Record, Debug, PartialEq)]
    struct Tags {
        tags: HashSet<String>,
    }

    let tags = Tags {
        tags: ["pear", "apple", "fig"].into_iter().map(String::from).collect(),
    };
    let config = Config::new().set_order(SetOrder::Sorted);
    let json = jsonrecord::to_value_with(&tags, &config).unwrap();
    assert_eq!(json, json!({"tags": ["apple", "fig", "pear"]}));

    let back = Tags::from_value(json).unwrap();
    assert_eq!(back, tags);
}

#[test]
fn nested_errors_carry_their_path() {
    setup();
    let err = from_str::<Everything>(
        &to_string(&everything())
            .unwrap()
            .replace(r#"{"label":"two"}"#, r#"{"label":2}"#),
    )
    .unwrap_err();
    assert_eq!(err.code(), "jsonrecord::invalid_type");
    assert_eq!(err.path.to_string(), "$.list[1].label");
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(transparent)]
struct Email {
    address: String,
}

#[test]
fn transparent_records_encode_as_their_field() {
    setup();
    let email = Email {
        address: "a@b.c".into(),
    };
    assert_eq!(to_value(&email).unwrap(), json!("a@b.c"));
    assert_eq!(from_str::<Email>("\"a@b.c\"").unwrap(), email);
    assert!(from_str::<Email>(r#"{"address": "a@b.c"}"#).is_err());
}
