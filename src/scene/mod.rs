//! Boundary model of a greeting card and its background templates.

pub(crate) mod model;
pub(crate) mod templates;
