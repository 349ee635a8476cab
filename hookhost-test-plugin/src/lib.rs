//! A minimal plugin exporting hooks in the `hookhost_v1` namespace.
//!
//! Built as a `cdylib` so the loader can open it like any third-party plugin.
//! It implements `init` and `friction_factor` but deliberately not `shutdown`.

/// Value returned by [`hookhost_v1_init`].
pub const INIT_CODE: i32 = 7;

#[no_mangle]
pub extern "C" fn hookhost_v1_init() -> i32 {
    INIT_CODE
}

/// Darcy friction factor for laminar flow.
#[no_mangle]
pub extern "C" fn hookhost_v1_friction_factor(reynolds: f64) -> f64 {
    64.0 / reynolds
}
