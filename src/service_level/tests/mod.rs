//! Unit tests for service-level arithmetic.
