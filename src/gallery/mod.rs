//! Static tribute gallery.

pub(crate) mod fighters;
