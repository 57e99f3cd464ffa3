use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

use chrono::{TimeZone, Utc};
use entmeta::{
    BooleanParsing, CoerceConfig, Coercer, EnumFallback, Entity, Enumeration, Reflect, ToValue,
    TypeDescriptor, Value, coerce, collection, concrete_collection_for, enumerate_members,
    is_collection, types,
};
use num_bigint::BigInt;
use uuid::Uuid;

#[derive(Enumeration, Debug, Clone, Copy, PartialEq)]
enum Status {
    #[entmeta(rename = "OPEN")]
    Open,
    #[entmeta(rename = "CLOSED")]
    Closed,
    Archived,
}

#[derive(Enumeration, Debug, Clone, Copy, PartialEq)]
#[entmeta(name = "Priority")]
enum Level {
    Low,
    High,
}

#[derive(Entity)]
struct Ticket {
    #[entmeta(id)]
    number: i64,
    status: Status,
    tags: Vec<String>,
    watchers: HashSet<String>,
    #[entmeta(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
}

fn declared_type(name: &str) -> &'static TypeDescriptor {
    enumerate_members(Some(Ticket::TYPE))
        .into_iter()
        .find(|m| m.name == name)
        .map(|m| m.declared_type())
        .unwrap()
}

#[test]
fn scalars_from_reflected_types() {
    assert_eq!(coerce("42", Some(<i32 as Reflect>::TYPE)).unwrap(), Value::Int(42));
    assert_eq!(coerce("-3", Some(<i8 as Reflect>::TYPE)).unwrap(), Value::TinyInt(-3));
    assert_eq!(coerce("7", Some(<Option<i64> as Reflect>::TYPE)).unwrap(), Value::BigInt(7));
    assert_eq!(coerce("2.5", Some(<f64 as Reflect>::TYPE)).unwrap(), Value::Double(2.5));
    assert_eq!(coerce("true", Some(<bool as Reflect>::TYPE)).unwrap(), Value::Bool(true));
    assert_eq!(
        coerce("hello", Some(<String as Reflect>::TYPE)).unwrap(),
        Value::Text("hello".to_string())
    );
}

#[test]
fn arbitrary_precision_and_instants() {
    let big = "98765432109876543210987654321";
    assert_eq!(
        coerce(big, Some(<BigInt as Reflect>::TYPE)).unwrap(),
        Value::BigInteger(big.parse().unwrap())
    );
    assert_eq!(
        coerce("3.14159265358979323846", Some(types::DECIMAL)).unwrap(),
        Value::Decimal("3.14159265358979323846".to_string())
    );

    let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        coerce("1704067200000", Some(types::DATE)).unwrap(),
        Value::Date(expected)
    );

    let raw = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";
    assert_eq!(
        coerce(raw, Some(<Uuid as Reflect>::TYPE)).unwrap(),
        Value::Uuid(Uuid::parse_str(raw).unwrap())
    );
}

#[test]
fn malformed_input_is_a_parse_error() {
    for (raw, target) in [
        ("abc", types::I32),
        ("1.5", types::I64),
        ("", types::F64),
        ("12x", types::BIG_INTEGER),
        ("1_000", types::BIG_INTEGER),
        ("inf", types::F64),
        ("1,5", types::DECIMAL),
        ("noon", types::DATE),
        ("not-a-uuid", types::UUID),
        ("maybe", types::BOOL),
    ] {
        let err = coerce(raw, Some(target)).unwrap_err();
        assert!(err.is_parse_error(), "{raw} -> {target}: {err}");
    }
}

#[test]
fn absent_target_passes_through() {
    assert_eq!(coerce("anything", None).unwrap(), Value::Text("anything".to_string()));
    assert_eq!(coerce("", None).unwrap(), Value::Text(String::new()));
}

#[test]
fn enumerations_match_exact_case_names() {
    let status = declared_type("status");
    assert!(status.is_enumeration());
    assert_eq!(status, Status::TYPE);

    assert_eq!(
        coerce("OPEN", Some(status)).unwrap(),
        Value::Enum {
            enum_type: "Status".to_string(),
            variant: "OPEN".to_string(),
        }
    );
    assert!(coerce("Archived", Some(status)).unwrap().is_enum_of("Status"));

    // no case-folding: degrades to the raw string
    assert_eq!(coerce("open", Some(status)).unwrap(), Value::Text("open".to_string()));

    let strict = Coercer::new(CoerceConfig::new().enum_fallback(EnumFallback::Reject));
    assert!(strict.coerce("open", Some(status)).unwrap_err().is_parse_error());
}

#[test]
fn enumeration_derive_round_trips_names() {
    assert_eq!(Status::Closed.variant_name(), "CLOSED");
    assert_eq!(Status::from_variant_name("CLOSED"), Some(Status::Closed));
    assert_eq!(Status::from_variant_name("Closed"), None);
    assert_eq!(Status::TYPE.variants, ["OPEN", "CLOSED", "Archived"]);

    assert_eq!(Level::TYPE.name, "Priority");
    assert_eq!(
        Level::High.to_value(),
        Value::Enum {
            enum_type: "Priority".to_string(),
            variant: "High".to_string(),
        }
    );
}

#[test]
fn lenient_booleans() {
    let lenient = Coercer::new(CoerceConfig::new().booleans(BooleanParsing::Lenient));
    assert_eq!(lenient.coerce("TRUE", Some(types::BOOL)).unwrap(), Value::Bool(true));
    assert_eq!(lenient.coerce("1", Some(types::BOOL)).unwrap(), Value::Bool(false));
}

#[test]
fn collection_members_resolve_to_concrete_types() {
    let tags = declared_type("tags");
    let watchers = declared_type("watchers");
    assert!(is_collection(tags));
    assert_eq!(concrete_collection_for(tags), Some(collection::VEC));
    assert_eq!(concrete_collection_for(watchers), Some(collection::HASH_SET));

    // collections are not coerced
    assert_eq!(coerce("a,b", Some(tags)).unwrap(), Value::Text("a,b".to_string()));

    let number = declared_type("number");
    assert_eq!(concrete_collection_for(number), None);
}

#[test]
fn abstract_collections_pick_defaults() {
    assert_eq!(concrete_collection_for(collection::SET), Some(collection::HASH_SET));
    assert_eq!(concrete_collection_for(collection::SORTED_SET), Some(collection::HASH_SET));
    assert_eq!(concrete_collection_for(collection::LIST), Some(collection::VEC));
    assert_eq!(concrete_collection_for(collection::COLLECTION), Some(collection::HASH_SET));
    assert_eq!(
        concrete_collection_for(collection::ABSTRACT_COLLECTION),
        Some(collection::HASH_SET)
    );

    for concrete in [
        <VecDeque<i32> as Reflect>::TYPE,
        <LinkedList<i32> as Reflect>::TYPE,
        <BTreeSet<i32> as Reflect>::TYPE,
    ] {
        assert_eq!(concrete_collection_for(concrete), Some(concrete));
    }
}

#[test]
fn entity_members_read_as_values() {
    let ticket = Ticket {
        number: 12,
        status: Status::Open,
        tags: vec!["ops".to_string()],
        watchers: HashSet::new(),
        scratch: Vec::new(),
    };

    assert_eq!(
        ticket.read_member(Ticket::TYPE, "status"),
        Some(Value::Enum {
            enum_type: "Status".to_string(),
            variant: "OPEN".to_string(),
        })
    );
    assert_eq!(
        ticket.read_member(Ticket::TYPE, "tags"),
        Some(Value::Array(vec![Value::Text("ops".to_string())]))
    );
    assert_eq!(ticket.read_member(Ticket::TYPE, "scratch"), None);
    assert_eq!(ticket.read_member(types::TEXT, "number"), None);
}
