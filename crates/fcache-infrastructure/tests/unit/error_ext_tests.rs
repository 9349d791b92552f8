//! Error context extension tests

use fcache_domain::error::Error;
use fcache_infrastructure::error_ext::ErrorContext;

fn io_failure() -> std::result::Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn test_context_wraps_as_infrastructure() {
    let err = io_failure().context("reading snapshot").unwrap_err();
    assert!(matches!(err, Error::Infrastructure { .. }));
    assert!(err.to_string().contains("reading snapshot: gone"));
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, std::io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context built for a success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_config_context_wraps_as_configuration() {
    let err = io_failure().config_context("loading fcache.toml").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(std::error::Error::source(&err).is_some());
}
