//! Request-independent business logic, generic over the storage backend.

pub mod messages;
