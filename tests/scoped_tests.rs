//! Scoped instances: isolation and disposal

mod common;

use common::*;
use morphic::{Error, MapperConfig, PropertyMap, ScopedMapper};

fn address() -> Address {
    Address {
        street: "Elm".to_string(),
        city: "Oslo".to_string(),
    }
}

#[test]
fn test_scoped_maps_like_the_mapper() {
    let scoped = ScopedMapper::create(MapperConfig::default()).unwrap();

    let dto: AddressDto = scoped.map_to(&address()).unwrap();
    assert_eq!(dto.city, "Oslo");

    let mut existing = AddressDto::default();
    scoped.map_into(&address(), &mut existing).unwrap();
    assert_eq!(existing.street, "Elm");

    let many: Vec<AddressDto> = scoped.map_many_to(&[address(), address()]).unwrap();
    assert_eq!(many.len(), 2);

    let props = scoped.to_property_map(&address()).unwrap();
    let back: Address = scoped.from_property_map(&props).unwrap();
    assert_eq!(back, address());
}

#[test]
fn test_instances_have_independent_caches() {
    let first = ScopedMapper::create(MapperConfig::default()).unwrap();
    let second = ScopedMapper::create(MapperConfig::default().with_lru_cache(2)).unwrap();

    let _: AddressDto = first.map_to(&address()).unwrap();
    let _: AddressDto = first.map_to(&address()).unwrap();

    assert_eq!(first.stats().unwrap().total, 1);
    assert_eq!(second.stats().unwrap().total, 0);
    assert_eq!(second.stats().unwrap().capacity, Some(2));
}

#[test]
fn test_instances_have_independent_depth_limits() {
    let shallow = ScopedMapper::create(MapperConfig::default().with_max_depth(2)).unwrap();
    let deep = ScopedMapper::create(MapperConfig::default()).unwrap();

    let cut: NodeDto = shallow.map_to(&chain(5)).unwrap();
    let full: NodeDto = deep.map_to(&chain(5)).unwrap();
    assert_eq!(chain_len(&cut), 2);
    assert_eq!(chain_len(&full), 5);
}

#[test]
fn test_hooks_are_per_instance() {
    let hooked = ScopedMapper::create(MapperConfig::default()).unwrap();
    let plain = ScopedMapper::create(MapperConfig::default()).unwrap();
    hooked
        .register_hook::<Address, AddressDto, _>(|_, dest| dest.street = "hooked".to_string())
        .unwrap();

    let a: AddressDto = hooked.map_to(&address()).unwrap();
    let b: AddressDto = plain.map_to(&address()).unwrap();
    assert_eq!(a.street, "hooked");
    assert_eq!(b.street, "Elm");
}

#[test]
fn test_every_operation_fails_after_close() {
    let scoped = ScopedMapper::create(MapperConfig::default()).unwrap();
    let _: AddressDto = scoped.map_to(&address()).unwrap();

    scoped.close();
    assert!(scoped.is_closed());

    assert!(matches!(scoped.map_to::<AddressDto, _>(&address()), Err(Error::Disposed)));
    let mut existing = AddressDto::default();
    assert_eq!(scoped.map_into(&address(), &mut existing), Err(Error::Disposed));
    let many: morphic::Result<Vec<AddressDto>> = scoped.map_many_to(&[address()]);
    assert!(matches!(many, Err(Error::Disposed)));
    assert!(matches!(scoped.to_property_map(&address()), Err(Error::Disposed)));
    assert!(matches!(
        scoped.from_property_map::<AddressDto>(&PropertyMap::new()),
        Err(Error::Disposed)
    ));
    assert_eq!(
        scoped.register_hook::<Address, AddressDto, _>(|_, _| {}),
        Err(Error::Disposed)
    );
    assert_eq!(scoped.clear_cache(), Err(Error::Disposed));
    assert_eq!(scoped.stats(), Err(Error::Disposed));
}

#[test]
fn test_close_is_idempotent() {
    let scoped = ScopedMapper::create(MapperConfig::default()).unwrap();
    scoped.close();
    scoped.close();
    assert!(scoped.is_closed());
}

#[test]
fn test_invalid_config_is_rejected() {
    let result = ScopedMapper::create(MapperConfig::default().with_lru_cache(0));
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
