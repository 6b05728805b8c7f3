//! Property map conversion in both directions

mod common;

use std::sync::Arc;

use common::*;
use morphic::{Field, Mapper, ObjectRef, PropertyMap, Value};

fn props(entries: &[(&str, Value)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_to_property_map() {
    let person = Person::new("Ada", 36, Some("London"));
    let map = Mapper::default().to_property_map(&person).unwrap();

    assert_eq!(map.len(), 4);
    assert_eq!(map["name"], Value::from("Ada"));
    assert_eq!(map["age"], Value::Int(36));
    assert_eq!(map["status"], Status::Active.to_value());

    let address = map["address"].as_object().unwrap();
    assert!(Arc::ptr_eq(
        &address.clone().downcast::<Address>().unwrap(),
        person.address.as_ref().unwrap()
    ));
}

#[test]
fn test_null_reference_reads_as_null() {
    let map = Mapper::default()
        .to_property_map(&Person::new("Ada", 36, None))
        .unwrap();
    assert!(map["address"].is_null());
}

#[test]
fn test_ignored_members_are_excluded() {
    let dto = UserDto {
        name: "ada".to_string(),
        display: "Ada".to_string(),
        password: "secret".to_string(),
        email: String::new(),
    };
    let map = Mapper::default().to_property_map(&dto).unwrap();
    assert!(!map.contains_key("password"));
    assert!(map.contains_key("display"));
}

#[test]
fn test_round_trip() {
    let mapper = Mapper::default();
    let person = Person::new("Ada", 36, Some("London"));

    let map = mapper.to_property_map(&person).unwrap();
    let back: Person = mapper.from_property_map(&map).unwrap();
    assert_eq!(back, person);
    assert!(Arc::ptr_eq(
        back.address.as_ref().unwrap(),
        person.address.as_ref().unwrap()
    ));
}

#[test]
fn test_round_trip_with_overrides() {
    let mapper = Mapper::default();
    let dto = UserDto {
        name: "ada".to_string(),
        display: "Ada Lovelace".to_string(),
        password: "secret".to_string(),
        email: "ada@example.com".to_string(),
    };

    let map = mapper.to_property_map(&dto).unwrap();
    let back: UserDto = mapper.from_property_map(&map).unwrap();
    assert_eq!(back.name, "ada");
    assert_eq!(back.display, "Ada Lovelace");
    assert_eq!(back.email, "ada@example.com");
    assert_eq!(back.password, "");
}

#[test]
fn test_override_key_wins_over_declared_name() {
    let map = props(&[
        ("full_name", Value::from("Ada Lovelace")),
        ("display", Value::from("ada")),
    ]);
    let dto: UserDto = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(dto.display, "Ada Lovelace");
}

#[test]
fn test_mixed_element_types_use_first_converter() {
    let person = Arc::new(Person::new("Ada", 36, Some("Rome")));
    let address = Arc::new(Address {
        street: "Elm".to_string(),
        city: "Oslo".to_string(),
    });
    let map = props(&[(
        "members",
        Value::List(vec![
            Value::Object(ObjectRef::new(person)),
            Value::Object(ObjectRef::new(address)),
        ]),
    )]);

    let team: TeamDto = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(team.members.len(), 2);

    let first = team.members[0].as_ref().unwrap();
    assert_eq!(first.name, "Ada");
    assert_eq!(first.address_city, "Rome");

    // Person -> PersonSummary reads nothing from an Address
    let second = team.members[1].as_ref().unwrap();
    assert_eq!(**second, PersonSummary::default());
}

#[test]
fn test_keys_match_case_insensitively() {
    let map = props(&[("NAME", Value::from("Ada")), ("Address_City", Value::from("Rome"))]);
    let summary: PersonSummary = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(summary.name, "Ada");
    assert_eq!(summary.address_city, "Rome");
}

#[test]
fn test_missing_and_unconvertible_values_are_skipped() {
    let map = props(&[("name", Value::from("Ada")), ("age", Value::from("old"))]);
    let person: Person = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 0);
    assert_eq!(person.status, Status::Inactive);
    assert!(person.address.is_none());
}

#[test]
fn test_values_are_coerced() {
    let map = props(&[
        ("count", Value::Int(7)),
        ("status", Status::Active.to_value()),
        ("score", Value::Int(3)),
        ("label", Value::Null),
        ("ratio", Value::Float(0.25)),
        ("samples", Value::List(vec![Value::Int(1), Value::Int(2)])),
    ]);
    let view: MetricsView = Mapper::default().from_property_map(&map).unwrap();

    assert_eq!(view.count, "7");
    assert_eq!(view.status, 1);
    assert_eq!(view.score, 3);
    assert_eq!(view.label, "");
    assert_eq!(view.ratio, Some(0.25));
    assert_eq!(view.samples, vec!["1", "2"]);
}

#[test]
fn test_object_values_are_mapped_to_declared_type() {
    let address = Arc::new(Address {
        street: "Elm".to_string(),
        city: "Oslo".to_string(),
    });
    let map = props(&[
        ("address", Value::Object(ObjectRef::new(address.clone()))),
        ("home", Value::Object(ObjectRef::new(address.clone()))),
    ]);
    let view: MetricsView = Mapper::default().from_property_map(&map).unwrap();

    assert_eq!(view.address.unwrap().city, "Oslo");
    assert!(Arc::ptr_eq(view.home.as_ref().unwrap(), &address));
}

#[test]
fn test_override_names_the_key() {
    let map = props(&[("full_name", Value::from("Ada Lovelace")), ("password", Value::from("x"))]);
    let dto: UserDto = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(dto.display, "Ada Lovelace");
    assert_eq!(dto.password, "");
}

#[test]
fn test_constructor_destination() {
    let map = props(&[("amount", Value::Int(10)), ("currency", Value::from("EUR"))]);
    let money: Money = Mapper::default().from_property_map(&map).unwrap();
    assert_eq!(money, Money::new(10, "EUR".to_string()));

    let partial: Money = Mapper::default()
        .from_property_map(&props(&[("currency", Value::from("GBP"))]))
        .unwrap();
    assert_eq!(partial.amount(), 0);
    assert_eq!(partial.currency(), "GBP");
}
