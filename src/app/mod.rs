pub(crate) mod router;
