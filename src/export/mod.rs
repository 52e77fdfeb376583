//! Encoding finished cards and handing them to the platform.

pub(crate) mod encode;
pub(crate) mod share;
