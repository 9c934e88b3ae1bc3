//! C ABI surface of the image-effect plugin interface.
//!
//! Plugins are shared libraries exporting `OfxGetNumberOfPlugins` and
//! `OfxGetPlugin`; everything here must match the plugin side
//! byte-for-byte, including the `Rocky.*` render-argument keys that
//! existing effect binaries read.

use std::ffi::{CStr, c_char, c_int, c_void};

pub type OfxStatus = c_int;

pub const STAT_OK: OfxStatus = 0;
pub const STAT_FAILED: OfxStatus = 1;
pub const STAT_ERR_UNSUPPORTED: OfxStatus = 5;
pub const STAT_ERR_BAD_HANDLE: OfxStatus = 9;
pub const STAT_ERR_VALUE: OfxStatus = 11;
pub const STAT_REPLY_DEFAULT: OfxStatus = 14;

/// Opaque property-set handle; on the host side this is always a
/// `*mut PropertySet`.
pub type OfxPropertySetHandle = *mut c_void;

pub const ACTION_LOAD: &CStr = c"OfxActionLoad";
pub const ACTION_DESCRIBE: &CStr = c"OfxActionDescribe";
pub const ACTION_RENDER: &CStr = c"OfxImageEffectActionRender";

pub const PROPERTY_SUITE_NAME: &CStr = c"OfxPropertySuite";

pub const PROP_NAME: &str = "OfxPropName";
pub const PROP_LABEL: &str = "OfxPropLabel";

/// Render-argument keys read by effect plugins. `SrcBuffer`/`DstBuffer`
/// point at RGBA8 buffers of identical layout.
pub const PROP_SRC_BUFFER: &str = "Rocky.SrcBuffer";
pub const PROP_DST_BUFFER: &str = "Rocky.DstBuffer";
pub const PROP_WIDTH: &str = "Rocky.Width";
pub const PROP_HEIGHT: &str = "Rocky.Height";
pub const PROP_ROW_BYTES: &str = "Rocky.RowBytes";

pub type OfxPluginEntryPoint = unsafe extern "C" fn(
    action: *const c_char,
    handle: *const c_void,
    in_args: OfxPropertySetHandle,
    out_args: OfxPropertySetHandle,
) -> OfxStatus;

pub type OfxSetHostFn = unsafe extern "C" fn(host: *mut OfxHost);

pub type OfxFetchSuiteFn = unsafe extern "C" fn(
    host: OfxPropertySetHandle,
    suite_name: *const c_char,
    suite_version: c_int,
) -> *const c_void;

#[repr(C)]
pub struct OfxHost {
    pub host: OfxPropertySetHandle,
    pub fetch_suite: Option<OfxFetchSuiteFn>,
}

#[repr(C)]
pub struct OfxPlugin {
    pub plugin_api: *const c_char,
    pub api_version: c_int,
    pub plugin_identifier: *const c_char,
    pub plugin_version_major: u32,
    pub plugin_version_minor: u32,
    pub set_host: Option<OfxSetHostFn>,
    pub main_entry: Option<OfxPluginEntryPoint>,
}

/// Entry points every plugin library must export.
pub type OfxGetNumberOfPluginsFn = unsafe extern "C" fn() -> c_int;
pub type OfxGetPluginFn = unsafe extern "C" fn(nth: c_int) -> *const OfxPlugin;

/// Property Suite v1 function table, in the canonical field order the
/// plugin side indexes into.
#[repr(C)]
pub struct OfxPropertySuiteV1 {
    pub prop_set_pointer: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_void) -> OfxStatus,
    >,
    pub prop_set_string: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *const c_char) -> OfxStatus,
    >,
    pub prop_set_double:
        Option<unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, f64) -> OfxStatus>,
    pub prop_set_int:
        Option<unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, c_int) -> OfxStatus>,
    pub prop_set_pointer_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_void)
            -> OfxStatus,
    >,
    pub prop_set_string_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *const c_char)
            -> OfxStatus,
    >,
    pub prop_set_double_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut f64) -> OfxStatus,
    >,
    pub prop_set_int_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_int) -> OfxStatus,
    >,
    pub prop_get_pointer: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_void)
            -> OfxStatus,
    >,
    pub prop_get_string: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_char)
            -> OfxStatus,
    >,
    pub prop_get_double: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut f64) -> OfxStatus,
    >,
    pub prop_get_int: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_int) -> OfxStatus,
    >,
    pub prop_get_pointer_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_void)
            -> OfxStatus,
    >,
    pub prop_get_string_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut *mut c_char)
            -> OfxStatus,
    >,
    pub prop_get_double_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut f64) -> OfxStatus,
    >,
    pub prop_get_int_n: Option<
        unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, c_int, *mut c_int) -> OfxStatus,
    >,
    pub prop_reset:
        Option<unsafe extern "C" fn(OfxPropertySetHandle, *const c_char) -> OfxStatus>,
    pub prop_get_dimension:
        Option<unsafe extern "C" fn(OfxPropertySetHandle, *const c_char, *mut c_int) -> OfxStatus>,
}
