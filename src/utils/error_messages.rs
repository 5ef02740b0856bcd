//! Messages returned to HTTP clients when a request cannot be served

pub const VALIDATION_ERROR: &str = "Validation failed";

pub const INTERNAL_ERROR: &str = "Internal error";
