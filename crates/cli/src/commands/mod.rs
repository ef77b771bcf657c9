pub(crate) mod contacts;
