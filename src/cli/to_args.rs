use std::ffi::OsString;

/// Render a parsed CLI structure back into the argv that would produce it
pub trait ToArgs {
    fn to_args(&self) -> Vec<OsString>;
}
