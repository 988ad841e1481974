use jsonrecord::{
    Config, Record, RecordExt, SerializeOptions, from_slice, from_str, from_str_with, to_string,
    to_string_pretty, to_string_with_options, to_vec, to_writer,
};
use jsonrecord_testhelpers::setup;

#[derive(Record, Debug, PartialEq)]
struct Entry {
    zeta: u8,
    alpha: Option<String>,
    nested: Vec<Pair>,
}

#[derive(Record, Debug, PartialEq)]
struct Pair {
    right: i8,
    left: i8,
}

fn entry() -> Entry {
    Entry {
        zeta: 1,
        alpha: None,
        nested: vec![Pair { right: 1, left: -1 }],
    }
}

#[test]
fn compact_output_keeps_declaration_order() {
    setup();
    assert_eq!(
        to_string(&entry()).unwrap(),
        r#"{"zeta":1,"alpha":null,"nested":[{"right":1,"left":-1}]}"#
    );
    assert_eq!(to_vec(&entry()).unwrap(), to_string(&entry()).unwrap().into_bytes());

    let mut out = Vec::new();
    to_writer(&mut out, &entry()).unwrap();
    assert_eq!(from_slice::<Entry>(&out).unwrap(), entry());
}

#[test]
fn pretty_output_and_sorted_keys() {
    setup();
    assert_eq!(
        to_string_pretty(&Pair { right: 1, left: 2 }).unwrap(),
        "{\n  \"right\": 1,\n  \"left\": 2\n}"
    );

    let options = SerializeOptions::new().sort_keys();
    assert_eq!(
        to_string_with_options(&entry(), &Config::default(), &options).unwrap(),
        r#"{"alpha":null,"nested":[{"left":-1,"right":1}],"zeta":1}"#
    );

    let options = SerializeOptions::new().indent("\t").sort_keys();
    assert_eq!(
        Pair { right: 1, left: 2 }
            .to_json_with(&Config::default(), &options)
            .unwrap(),
        "{\n\t\"left\": 2,\n\t\"right\": 1\n}"
    );
}

#[test]
fn malformed_text_is_a_json_error() {
    setup();
    let err = from_str::<Entry>("{\"zeta\": ").unwrap_err();
    assert_eq!(err.code(), "jsonrecord::json");

    let err = from_str::<Entry>(r#"{"zeta": 300, "alpha": null, "nested": []}"#).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::invalid_value");
    assert_eq!(err.path.to_string(), "$.zeta");
}

#[test]
fn text_decoding_honors_the_config() {
    setup();
    let config = Config::new().infer_missing(true);
    let decoded: Entry = from_str_with(r#"{"zeta": 4, "nested": []}"#, &config).unwrap();
    assert_eq!(decoded.alpha, None);
    assert!(Entry::from_json(r#"{"zeta": 4, "nested": []}"#).is_err());
}
