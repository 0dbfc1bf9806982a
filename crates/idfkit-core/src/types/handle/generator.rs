use crate::types::{Handle, HandleError};
use std::sync::{LazyLock, Mutex, PoisonError};
use ulid::{Generator, Ulid};

///
/// GENERATOR is lazily initiated with a Mutex
/// it has to keep state so handles stay monotonic
///

static GENERATOR: LazyLock<Mutex<Generator>> = LazyLock::new(|| Mutex::new(Generator::new()));

/// Generate a handle using the global monotonic generator.
pub(crate) fn generate() -> Result<Handle, HandleError> {
    let mut generator = GENERATOR.lock().unwrap_or_else(PoisonError::into_inner);

    generator
        .generate()
        .map(Handle::from)
        .map_err(|_| HandleError::GeneratorOverflow)
}

/// Monotonic handle, or a fresh random one once the millisecond is exhausted.
pub(crate) fn generate_or_fresh() -> Handle {
    or_fresh(generate())
}

fn or_fresh(result: Result<Handle, HandleError>) -> Handle {
    result.unwrap_or_else(|_| Handle::from(Ulid::new()))
}

///
/// TESTS
///
