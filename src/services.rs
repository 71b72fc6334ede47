pub(crate) mod connectivity;
