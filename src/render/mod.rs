//! CPU compositor.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod surface;
