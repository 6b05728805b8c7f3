//! Converter cache behaviour through the mapper: idempotence, concurrent
//! population, bounded eviction and statistics

mod common;

use std::any::Any;
use std::sync::Arc;
use std::thread;

use common::*;
use morphic::{
    mappable, Error, Mappable, Mapper, MapperConfig, MemberShape, TypeShape, UnboundedCache, Value,
};
use rayon::prelude::*;

// =============================================================================
// PROBE TYPES
// =============================================================================

/// One distinct source type per `N`, so every `N` is its own cache entry
struct Probe<const N: usize>;

impl<const N: usize> Mappable for Probe<N> {
    fn shape() -> TypeShape {
        TypeShape::new("Probe")
            .initializer(|| -> Box<dyn Any + Send + Sync> { Box::new(Probe::<N>) })
            .member(
                MemberShape::new("n", <u64 as morphic::Field>::type_ref())
                    .getter(|_: &dyn Any| Value::UInt(N as u64)),
            )
    }
}

#[derive(Debug, Default)]
struct Sink {
    n: u64,
}

mappable!(Sink { n: u64 });

fn map_probe<const N: usize>(mapper: &Mapper) {
    let sink: Sink = mapper.map_to(&Probe::<N>).unwrap();
    assert_eq!(sink.n, N as u64);
}

/// Map one `Probe<N>` for every three-digit `N` whose hundreds digit is listed
macro_rules! probe_all {
    (@units $mapper:expr; $h:literal $t:literal; $($u:literal)*) => {
        $( map_probe::<{ $h * 100 + $t * 10 + $u }>($mapper); )*
    };
    (@tens $mapper:expr; $h:literal; $($t:literal)*) => {
        $( probe_all!(@units $mapper; $h $t; 0 1 2 3 4 5 6 7 8 9); )*
    };
    ($mapper:expr; $($h:literal)*) => {
        $( probe_all!(@tens $mapper; $h; 0 1 2 3 4 5 6 7 8 9); )*
    };
}

// =============================================================================
// UNBOUNDED
// =============================================================================

#[test]
fn test_second_lookup_is_a_hit() {
    let mapper = Mapper::default();
    let person = Person::new("Ada", 36, Some("London"));

    let first: PersonSummary = mapper.map_to(&person).unwrap();
    let second: PersonSummary = mapper.map_to(&person).unwrap();
    assert_eq!(first, second);

    let stats = mapper.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.total, 1);
    assert_eq!(stats.capacity, None);
    assert_eq!(stats.hit_ratio(), 0.5);
}

#[test]
fn test_nested_pairs_are_cached_separately() {
    let mapper = Mapper::default();
    let team = Team {
        members: vec![Some(Arc::new(Person::new("Ada", 36, None)))],
    };

    let _: TeamDto = mapper.map_to(&team).unwrap();
    assert_eq!(mapper.stats().total, 2);
}

#[test]
fn test_clear_cache_resets_stats() {
    let mapper = Mapper::default();
    let _: AddressDto = mapper.map_to(&Address::default()).unwrap();
    let _: AddressDto = mapper.map_to(&Address::default()).unwrap();

    mapper.clear_cache();
    let stats = mapper.stats();
    assert_eq!((stats.hits, stats.misses, stats.total), (0, 0, 0));

    // rebuilt on demand
    let dto: AddressDto = mapper
        .map_to(&Address {
            street: "Elm".to_string(),
            city: "Oslo".to_string(),
        })
        .unwrap();
    assert_eq!(dto.city, "Oslo");
    assert_eq!(mapper.stats().misses, 1);
}

#[test]
fn test_clones_share_the_cache() {
    let mapper = Mapper::default();
    let clone = mapper.clone();

    let _: AddressDto = mapper.map_to(&Address::default()).unwrap();
    let _: AddressDto = clone.map_to(&Address::default()).unwrap();
    assert_eq!(clone.stats().hits, 1);
}

#[test]
fn test_concurrent_mapping_converges_on_one_entry() {
    let mapper = Mapper::default();
    let people: Vec<Person> = (0..256)
        .map(|i| Person::new(&format!("p{}", i), i, Some("Lyon")))
        .collect();

    let summaries: Vec<PersonSummary> = people
        .par_iter()
        .map(|person| mapper.map_to(person).unwrap())
        .collect();

    for (person, summary) in people.iter().zip(&summaries) {
        assert_eq!(summary.name, person.name);
        assert_eq!(summary.address_city, "Lyon");
    }

    let stats = mapper.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.hits + stats.misses, 256);
    assert!(stats.misses >= 1);
}

#[test]
fn test_racing_builders_observe_first_insert() {
    let cache: Arc<UnboundedCache<u32, Arc<usize>>> = Arc::new(UnboundedCache::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let cache = cache.clone();
            thread::spawn(move || {
                cache
                    .get_or_build(7, || Ok::<_, ()>(Arc::new(i)))
                    .unwrap()
            })
        })
        .collect();

    let seen: Vec<Arc<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let kept = cache.try_get(&7).unwrap();
    assert!(seen.iter().all(|v| Arc::ptr_eq(v, &kept)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_failed_build_is_not_cached() {
    let mapper = Mapper::default();
    assert!(matches!(
        mapper.map_to::<Opaque, _>(&Address::default()),
        Err(Error::NoConstructor { .. })
    ));
    assert_eq!(mapper.stats().total, 0);
}

// =============================================================================
// BOUNDED
// =============================================================================

#[test]
fn test_lru_reports_capacity() {
    let mapper = Mapper::new(MapperConfig::default().with_lru_cache(10)).unwrap();
    let _: AddressDto = mapper.map_to(&Address::default()).unwrap();
    let _: AddressDto = mapper.map_to(&Address::default()).unwrap();

    let stats = mapper.stats();
    assert_eq!(stats.capacity, Some(10));
    assert_eq!((stats.hits, stats.misses, stats.total), (1, 1, 1));
}

#[test]
fn test_lru_stays_bounded_over_many_pairs() {
    let mapper = Mapper::new(MapperConfig::default().with_lru_cache(10)).unwrap();

    probe_all!(&mapper; 0 1 2 3 4 5 6 7 8 9);

    let stats = mapper.stats();
    assert_eq!(stats.misses, 1000);
    assert_eq!(stats.hits, 0);
    assert!(stats.total <= 12, "total {} exceeds capacity plus slack", stats.total);
    assert!(stats.total >= 10);

    // evicted pairs are rebuilt transparently
    map_probe::<0>(&mapper);
    assert_eq!(mapper.stats().misses, 1001);
}

#[test]
fn test_lru_concurrent_population_is_bounded() {
    let mapper = Mapper::new(MapperConfig::default().with_lru_cache(4)).unwrap();

    (0..64).into_par_iter().for_each(|i| match i % 8 {
        0 => map_probe::<0>(&mapper),
        1 => map_probe::<1>(&mapper),
        2 => map_probe::<2>(&mapper),
        3 => map_probe::<3>(&mapper),
        4 => map_probe::<4>(&mapper),
        5 => map_probe::<5>(&mapper),
        6 => map_probe::<6>(&mapper),
        _ => map_probe::<7>(&mapper),
    });

    // a thread that loses the eviction gate may leave the count above the
    // bound; the next uncontended insert trims it
    map_probe::<8>(&mapper);
    assert!(mapper.stats().total <= 5);
}

#[test]
fn test_zero_capacity_lru_is_rejected() {
    let config = MapperConfig::default().with_lru_cache(0);
    assert!(matches!(Mapper::new(config), Err(Error::InvalidConfig(_))));

    let parsed = MapperConfig::from_json(r#"{"use_lru_cache": true, "max_cache_size": 0}"#);
    assert!(matches!(parsed, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_config_from_json_selects_lru() {
    let config =
        MapperConfig::from_json(r#"{"use_lru_cache": true, "max_cache_size": 3, "max_depth": 4}"#)
            .unwrap();
    let mapper = Mapper::new(config).unwrap();
    assert_eq!(mapper.config().max_depth, 4);
    assert_eq!(mapper.stats().capacity, Some(3));
}
