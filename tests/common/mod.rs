//! Shared models for the integration tests

#![allow(dead_code)]

use std::any::Any;
use std::sync::{Arc, Mutex, OnceLock};

use morphic::{mappable, mappable_enum, Field, Mappable, MapperConfig, MemberShape, TypeShape, Value};

// =============================================================================
// PEOPLE
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Inactive,
    Active,
}

mappable_enum!(Status { Inactive = 0, Active = 1 });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

mappable!(Address { street: String, city: String });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressDto {
    pub street: String,
    pub city: String,
}

mappable!(AddressDto { street: String, city: String });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub status: Status,
    pub address: Option<Arc<Address>>,
}

mappable!(Person {
    name: String,
    age: i32,
    status: Status,
    address: Option<Arc<Address>>,
});

impl Person {
    pub fn new(name: &str, age: i32, city: Option<&str>) -> Self {
        Person {
            name: name.to_string(),
            age,
            status: Status::Active,
            address: city.map(|c| {
                Arc::new(Address {
                    street: "1 Main St".to_string(),
                    city: c.to_string(),
                })
            }),
        }
    }
}

/// Flattened view of a person; `note` has no source member
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonSummary {
    pub name: String,
    pub address_city: String,
    pub note: String,
}

mappable!(PersonSummary {
    name: String,
    address_city: String,
    note: String,
});

// =============================================================================
// COERCIONS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub count: i32,
    pub status: Status,
    pub score: Option<i32>,
    pub label: Option<String>,
    pub ratio: f64,
    pub address: Option<Arc<Address>>,
    pub home: Option<Arc<Address>>,
    pub samples: Vec<i32>,
}

mappable!(Metrics {
    count: i32,
    status: Status,
    score: Option<i32>,
    label: Option<String>,
    ratio: f64,
    address: Option<Arc<Address>>,
    home: Option<Arc<Address>>,
    samples: Vec<i32>,
});

#[derive(Debug, Clone, Default)]
pub struct MetricsView {
    pub count: String,
    pub status: i32,
    pub score: i32,
    pub label: String,
    pub ratio: Option<f64>,
    pub address: Option<Arc<AddressDto>>,
    pub home: Option<Arc<Address>>,
    pub samples: Vec<String>,
}

mappable!(MetricsView {
    count: String,
    status: i32,
    score: i32,
    label: String,
    ratio: Option<f64>,
    address: Option<Arc<AddressDto>>,
    home: Option<Arc<Address>>,
    samples: Vec<String>,
});

// =============================================================================
// SEQUENCES
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Team {
    pub members: Vec<Option<Arc<Person>>>,
}

mappable!(Team { members: Vec<Option<Arc<Person>>> });

#[derive(Debug, Clone, Default)]
pub struct TeamDto {
    pub members: Box<[Option<Arc<PersonSummary>>]>,
}

mappable!(TeamDto { members: Box<[Option<Arc<PersonSummary>>]> });

// =============================================================================
// DECORATIONS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct User {
    pub name: String,
    pub full_name: String,
    pub password: String,
    pub email: String,
}

mappable!(User {
    name: String,
    full_name: String,
    password: String,
    email: String,
});

#[derive(Debug, Clone, Default)]
pub struct UserDto {
    pub name: String,
    pub display: String,
    pub password: String,
    pub email: String,
}

mappable!(UserDto {
    name: String,
    #[from(full_name)]
    display: String,
    #[ignore]
    password: String,
    #[from(contact)]
    email: String,
});

// =============================================================================
// CONSTRUCTOR-BOUND
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Price {
    pub amount: i64,
    pub currency: String,
    pub note: String,
}

mappable!(Price {
    amount: i64,
    currency: String,
    note: String,
});

#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    amount: i64,
    currency: String,
}

impl Money {
    pub fn new(amount: i64, currency: String) -> Self {
        Money { amount, currency }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

mappable!(Money via Money::new(amount: i64, currency: String) {
    amount: i64,
    currency: String,
});

/// Registered type with no way to be constructed
pub struct Opaque;

impl Mappable for Opaque {
    fn shape() -> TypeShape {
        TypeShape::new("Opaque")
    }
}

#[derive(Debug, Default)]
pub struct Misspelled {
    pub name: String,
}

mappable!(Misspelled {
    #[ignroe]
    name: String,
});

// =============================================================================
// RECURSION
// =============================================================================

/// A node whose link can be closed into a true cycle after construction
pub struct Ring {
    pub name: String,
    pub next: OnceLock<Arc<Ring>>,
}

impl Ring {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Ring {
            name: name.to_string(),
            next: OnceLock::new(),
        })
    }
}

impl Mappable for Ring {
    fn shape() -> TypeShape {
        TypeShape::new("Ring")
            .member(
                MemberShape::new("name", <String as Field>::type_ref()).getter(|obj: &dyn Any| {
                    obj.downcast_ref::<Ring>()
                        .map(|ring| ring.name.to_value())
                        .unwrap_or(Value::Null)
                }),
            )
            .member(
                MemberShape::new("next", <Option<Arc<Ring>> as Field>::type_ref()).getter(
                    |obj: &dyn Any| {
                        obj.downcast_ref::<Ring>()
                            .map(|ring| ring.next.get().cloned().to_value())
                            .unwrap_or(Value::Null)
                    },
                ),
            )
    }
}

#[derive(Debug, Default)]
pub struct RingDto {
    pub name: String,
    pub next: Option<Arc<RingDto>>,
}

mappable!(RingDto {
    name: String,
    next: Option<Arc<RingDto>>,
});

#[derive(Debug, Default)]
pub struct Node {
    pub value: i32,
    pub child: Option<Arc<Node>>,
}

mappable!(Node {
    value: i32,
    child: Option<Arc<Node>>,
});

#[derive(Debug, Default)]
pub struct NodeDto {
    pub value: i32,
    pub child: Option<Arc<NodeDto>>,
}

mappable!(NodeDto {
    value: i32,
    child: Option<Arc<NodeDto>>,
});

/// Linked chain `0 -> 1 -> ... -> len-1`
pub fn chain(len: i32) -> Node {
    let mut node = Node {
        value: len - 1,
        child: None,
    };
    for value in (0..len - 1).rev() {
        node = Node {
            value,
            child: Some(Arc::new(node)),
        };
    }
    node
}

/// Number of nodes reachable through `child`
pub fn chain_len(root: &NodeDto) -> usize {
    let mut len = 1;
    let mut current = root.child.clone();
    while let Some(node) = current {
        len += 1;
        current = node.child.clone();
    }
    len
}

// =============================================================================
// HELPERS
// =============================================================================

/// Config whose logger records every line
pub fn recording_config() -> (MapperConfig, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let config = MapperConfig::default().with_logger(move |line| {
        sink.lock().unwrap().push(line.to_string());
    });
    (config, lines)
}
