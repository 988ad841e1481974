use jsonrecord::{Record, RecordExt, from_value, to_value};
use jsonrecord_testhelpers::setup;
use serde_json::json;

#[derive(Record, Debug, Clone, PartialEq)]
struct Animal {
    name: String,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Dog {
    name: String,
    good_boy: bool,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Cat {
    name: String,
    lives: u8,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(subtypes)]
enum AnyAnimal {
    #[record(base)]
    Animal(Animal),
    Dog(Dog),
    #[record(rename = "kitty")]
    Cat(Cat),
}

#[derive(Record, Debug, Clone, PartialEq)]
#[record(tag = "kind")]
enum Shape {
    Circle(Circle),
    Square(Square),
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Circle {
    radius: f64,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Square {
    side: f64,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Zoo {
    animals: Vec<AnyAnimal>,
    mascot: Option<AnyAnimal>,
}

#[test]
fn encoding_writes_the_discriminator() {
    setup();
    let dog = AnyAnimal::Dog(Dog {
        name: "Rex".into(),
        good_boy: true,
    });
    assert_eq!(
        to_value(&dog).unwrap(),
        json!({"@type": "Dog", "name": "Rex", "good_boy": true})
    );

    let cat = AnyAnimal::Cat(Cat {
        name: "Tom".into(),
        lives: 9,
    });
    assert_eq!(to_value(&cat).unwrap()["@type"], "kitty");

    let circle = Shape::Circle(Circle { radius: 1.5 });
    assert_eq!(
        to_value(&circle).unwrap(),
        json!({"kind": "Circle", "radius": 1.5})
    );
}

#[test]
fn decoding_picks_the_subtype() {
    setup();
    let zoo = Zoo {
        animals: vec![
            AnyAnimal::Dog(Dog {
                name: "Rex".into(),
                good_boy: false,
            }),
            AnyAnimal::Cat(Cat {
                name: "Tom".into(),
                lives: 3,
            }),
        ],
        mascot: Some(AnyAnimal::Animal(Animal { name: "Polly".into() })),
    };
    let json = zoo.to_value().unwrap();
    assert_eq!(Zoo::from_value(json).unwrap(), zoo);
}

#[test]
fn missing_discriminator_falls_back_to_the_base() {
    setup();
    let animal: AnyAnimal = from_value(json!({"name": "Polly"})).unwrap();
    assert_eq!(animal, AnyAnimal::Animal(Animal { name: "Polly".into() }));

    let err = from_value::<Shape>(json!({"side": 2.0})).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::missing_discriminator");
}

#[test]
fn unknown_discriminators_are_rejected() {
    setup();
    let err = from_value::<AnyAnimal>(json!({"@type": "Cow", "name": "Daisy"})).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::unknown_subtype");

    // the base type is never selected by value
    let err = from_value::<AnyAnimal>(json!({"@type": "Animal", "name": "Daisy"})).unwrap_err();
    assert_eq!(err.code(), "jsonrecord::unknown_subtype");
}
