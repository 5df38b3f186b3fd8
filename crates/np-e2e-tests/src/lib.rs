//! Test-only crate; the integration suites live under `tests/`.
