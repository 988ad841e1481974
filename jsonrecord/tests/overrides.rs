use chrono::{DateTime, Utc};
use jsonrecord::{
    Config, Decoder, Encoder, Json, Record, RecordExt, TimestampFormat, from_value,
    from_value_with, to_value, to_value_with,
};
use jsonrecord_testhelpers::{capture_warnings, setup};
use serde_json::json;

#[derive(Record, Debug, PartialEq)]
#[record(letter_case = "camelCase")]
struct Person {
    given_name: String,
    family_name: String,
    #[record(letter_case = "kebab-case")]
    home_town: String,
    #[record(rename = "years")]
    age_in_years: u32,
}

#[test]
fn letter_case_applies_both_ways() {
    setup();
    let person = Person {
        given_name: "Ada".into(),
        family_name: "Lovelace".into(),
        home_town: "London".into(),
        age_in_years: 36,
    };
    let json = person.to_value().unwrap();
    assert_eq!(
        json,
        json!({"givenName": "Ada", "familyName": "Lovelace", "home-town": "London", "years": 36})
    );
    assert_eq!(Person::from_value(json).unwrap(), person);
}

#[test]
fn field_names_are_accepted_alongside_wire_names() {
    setup();
    let person: Person = from_value(json!({
        "given_name": "Ada",
        "familyName": "Lovelace",
        "home-town": "London",
        "years": 36,
    }))
    .unwrap();
    assert_eq!(person.given_name, "Ada");
}

#[derive(Record, Debug, PartialEq)]
struct Renamed {
    #[record(rename = "the_value", letter_case = "PascalCase")]
    value: i32,
}

#[test]
fn renames_pass_through_the_field_letter_case_only() {
    setup();
    let json = to_value(&Renamed { value: 1 }).unwrap();
    assert_eq!(json, json!({"TheValue": 1}));
}

fn shout(name: &String) -> Json {
    Json::from(name.to_uppercase())
}

fn parse_flag(value: Json) -> Result<bool, String> {
    match value.as_str() {
        Some("yes") => Ok(true),
        Some("no") => Ok(false),
        _ => Err(format!("expected yes or no, got {value}")),
    }
}

#[derive(Record, Debug, PartialEq)]
struct Custom {
    #[record(encoder = shout)]
    name: String,
    #[record(decoder = parse_flag)]
    flag: bool,
    #[record(exclude = "always")]
    secret: Option<String>,
    #[record(exclude_if = Option::is_none)]
    note: Option<String>,
    #[record(encoder = "iso8601")]
    at: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(0, 0).unwrap()
}

#[test]
fn field_encoders_decoders_and_exclusion() {
    setup();
    let custom = Custom {
        name: "quiet".into(),
        flag: true,
        secret: Some("hunter2".into()),
        note: None,
        at: epoch(),
    };
    let json = to_value(&custom).unwrap();
    assert_eq!(json, json!({"name": "QUIET", "flag": true, "at": "1970-01-01T00:00:00+00:00"}));

    let decoded: Custom = from_value(json!({
        "name": "loud",
        "flag": "no",
        "secret": null,
        "note": "hi",
        "at": "1970-01-01T00:00:00Z",
    }))
    .unwrap();
    assert!(!decoded.flag);
    assert_eq!(decoded.note.as_deref(), Some("hi"));
    assert_eq!(decoded.at, epoch());

    let err = from_value::<Custom>(json!({"name": "n", "flag": 1, "secret": null, "note": null, "at": 0}))
        .unwrap_err();
    assert_eq!(err.code(), "jsonrecord::custom");
    assert_eq!(err.path.to_string(), "$.flag");
}

#[derive(Record, Debug, PartialEq)]
struct Counts {
    plain: u32,
    #[record(encoder = hex)]
    own: u32,
}

fn hex(value: &u32) -> Json {
    Json::from(format!("{value:x}"))
}

#[test]
fn global_overrides_rank_below_field_metadata() {
    setup();
    let config = Config::new()
        .encoder::<u32>(Encoder::custom::<u32, _>(|v| Json::from(format!("#{v}"))))
        .decoder::<u32>(Decoder::try_custom::<u32, String, _>(|value| {
            value
                .as_str()
                .and_then(|s| s.strip_prefix('#'))
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| "expected #number".to_string())
        }));

    let counts = Counts { plain: 10, own: 255 };
    let json = to_value_with(&counts, &config).unwrap();
    assert_eq!(json, json!({"plain": "#10", "own": "ff"}));

    let back: Counts = from_value_with(json!({"plain": "#10", "own": "#255"}), &config).unwrap();
    assert_eq!(back, counts);

    // the default configuration is unaffected
    assert_eq!(to_value(&counts).unwrap(), json!({"plain": 10, "own": "ff"}));
}

#[test]
fn timestamp_format_is_configurable() {
    setup();

    #[derive(Record, Debug, PartialEq)]
    struct Event {
        at: DateTime<Utc>,
        #[record(encoder = "posix")]
        always_posix: DateTime<Utc>,
    }

    let event = Event {
        at: epoch(),
        always_posix: epoch(),
    };
    assert_eq!(to_value(&event).unwrap(), json!({"at": 0.0, "always_posix": 0.0}));

    let config = Config::new().timestamp_format(TimestampFormat::Iso8601);
    assert_eq!(
        to_value_with(&event, &config).unwrap(),
        json!({"at": "1970-01-01T00:00:00+00:00", "always_posix": 0.0})
    );
}

#[derive(Record, Debug, PartialEq)]
struct Leaf {
    depth: u8,
}

#[derive(Record, Debug, PartialEq)]
struct Branch {
    leaf: Leaf,
}

#[derive(Record, Debug, PartialEq)]
struct Root {
    branch: Branch,
    leaves: Vec<Leaf>,
}

#[test]
fn resolved_overrides_are_cached_per_record() {
    setup();
    let config = Config::new();
    assert_eq!(config.cached_records(), 0);

    let _: Root = from_value_with(
        json!({"branch": {"leaf": {"depth": 2}}, "leaves": [{"depth": 1}, {"depth": 1}]}),
        &config,
    )
    .unwrap();
    assert_eq!(config.cached_records(), 3);

    config.clear_cache();
    assert_eq!(config.cached_records(), 0);
}

#[derive(Record, Debug, PartialEq)]
struct Sparse {
    count: Option<i32>,
}

#[test]
fn missing_optional_fields_are_inferred_only_on_request() {
    setup();
    let inferred: Sparse = from_value_with(json!({}), &Config::new().infer_missing(true)).unwrap();
    assert_eq!(inferred, Sparse { count: None });

    let err = from_value::<Sparse>(json!({})).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::missing_field");
}

#[derive(Record, Debug, PartialEq)]
struct WithDefault {
    #[record(default = 5)]
    x: i64,
    #[record(default)]
    tags: Vec<String>,
}

#[test]
fn null_for_a_plain_field_warns_and_uses_the_default() {
    setup();
    let (decoded, warnings) = capture_warnings(|| from_value::<WithDefault>(json!({"x": null})));
    assert_eq!(
        decoded.unwrap(),
        WithDefault {
            x: 5,
            tags: vec![]
        }
    );
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("non-optional"), "{warnings:?}");
}
