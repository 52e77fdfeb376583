//! Scene → render plan lowering.

pub(crate) mod plan;
