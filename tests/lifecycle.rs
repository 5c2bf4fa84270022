use std::sync::Arc;

use chronovec::error::ChronovecError;
use chronovec::parse::{FormatSpec, TemporalKind};
use chronovec::registry::registry;
use chronovec::settings::EngineSettings;
use chronovec::source::{RawColumnView, TextColumn};
use chronovec::vector::LazyTemporalVector;

fn small_vector(settings: EngineSettings) -> LazyTemporalVector {
    let column = Arc::new(TextColumn::new(vec![
        String::from("2021-03-15"),
        String::from("bad"),
        String::from("1970-01-01"),
    ]));
    LazyTemporalVector::date(column, FormatSpec::Default, settings)
}

#[test]
fn release_is_idempotent() {
    let vector = small_vector(EngineSettings::default());
    vector.release();
    vector.release();
    match vector.materialize() {
        Err(ChronovecError::Released(_)) => (),
        other => panic!("expected Released, got {other:?}"),
    }
}

#[test]
fn materialized_vector_survives_release() {
    let vector = small_vector(EngineSettings::default());
    let before: Vec<_> = (0..vector.len()).map(|row| vector.get(row)).collect();
    vector.materialize().expect("materialize ok");
    vector.release();
    vector.release();
    for (row, cell) in before.iter().enumerate() {
        assert_eq!(vector.get(row), *cell);
    }
    // a released vector still answers the idempotent bulk call from cache
    assert!(vector.materialize().is_ok());
}

#[test]
fn source_handed_back_after_materialization_when_configured() {
    let column: Arc<dyn RawColumnView> = Arc::new(TextColumn::new(vec![
        String::from("2021-03-15"),
    ]));
    let settings = EngineSettings {
        release_source_after_materialize: true,
        ..EngineSettings::default()
    };
    let vector = LazyTemporalVector::date(Arc::clone(&column), FormatSpec::Default, settings);
    assert_eq!(Arc::strong_count(&column), 2);
    vector.materialize().expect("materialize ok");
    assert_eq!(Arc::strong_count(&column), 1);
    // reads keep working from the buffer
    assert_eq!(vector.get(0), Some(18701.0));
}

#[test]
fn inspect_reports_state() {
    let vector = small_vector(EngineSettings::default());
    assert_eq!(vector.inspect(), "chronovec_date (len=3, materialized=F)");
    vector.get(0);
    assert_eq!(vector.inspect(), "chronovec_date (len=3, materialized=F)");
    vector.materialize().expect("materialize ok");
    assert_eq!(vector.inspect(), "chronovec_date (len=3, materialized=T)");
}

#[test]
fn registry_bootstraps_once() {
    let first = registry();
    let second = registry();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.len(), 2);
    assert_eq!(first.class_for(TemporalKind::Date).name(), "chronovec_date");
    assert_eq!(first.class_for(TemporalKind::DateTime).name(), "chronovec_dttm");
    assert_eq!(
        first.class_for(TemporalKind::Date).unit(),
        "days since 1970-01-01"
    );
}

#[test]
#[should_panic(expected = "out of bounds")]
fn out_of_bounds_get_panics() {
    let vector = small_vector(EngineSettings::default());
    vector.get(3);
}

#[test]
#[should_panic(expected = "after release")]
fn get_after_release_without_buffer_panics() {
    let vector = small_vector(EngineSettings::default());
    vector.release();
    vector.get(0);
}
