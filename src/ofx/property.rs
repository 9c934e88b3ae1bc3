//! Host-private property sets and the Property Suite v1 implementation.
//!
//! A `PropertySet` is the string-keyed heterogeneous bag passed across the
//! plugin ABI. The extern "C" suite functions cast the opaque handle back
//! to `*mut PropertySet`; a null or foreign handle yields `BadHandle`, a
//! missing key yields `Value`. Nothing here may panic — panics must not
//! cross the ABI boundary.

use std::collections::HashMap;
use std::ffi::{CStr, CString, c_char, c_int, c_void};

use crate::ofx::abi::{
    self, OfxPropertySetHandle, OfxPropertySuiteV1, OfxStatus, STAT_ERR_BAD_HANDLE, STAT_ERR_VALUE,
    STAT_OK,
};

#[derive(Default)]
pub struct PropertySet {
    name: String,
    strings: HashMap<String, CString>,
    pointers: HashMap<String, *mut c_void>,
    ints: HashMap<String, c_int>,
    doubles: HashMap<String, f64>,
}

impl PropertySet {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        // Interior NULs cannot be represented across the C boundary; drop
        // the tail rather than fail the whole set.
        let cstring = CString::new(value)
            .unwrap_or_else(|e| {
                let nul = e.nul_position();
                let mut bytes = e.into_vec();
                bytes.truncate(nul);
                CString::new(bytes).unwrap_or_default()
            });
        self.strings.insert(key.to_owned(), cstring);
    }

    pub fn set_pointer(&mut self, key: &str, value: *mut c_void) {
        self.pointers.insert(key.to_owned(), value);
    }

    pub fn set_int(&mut self, key: &str, value: c_int) {
        self.ints.insert(key.to_owned(), value);
    }

    pub fn set_double(&mut self, key: &str, value: f64) {
        self.doubles.insert(key.to_owned(), value);
    }

    pub fn string(&self, key: &str) -> Option<&CStr> {
        self.strings.get(key).map(CString::as_c_str)
    }

    pub fn pointer(&self, key: &str) -> Option<*mut c_void> {
        self.pointers.get(key).copied()
    }

    pub fn int(&self, key: &str) -> Option<c_int> {
        self.ints.get(key).copied()
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        self.doubles.get(key).copied()
    }

    /// The opaque handle handed to plugins. Valid as long as the set is
    /// neither moved nor dropped.
    pub fn handle(&mut self) -> OfxPropertySetHandle {
        std::ptr::from_mut(self).cast()
    }
}

/// The suite table returned from `fetchSuite("OfxPropertySuite", 1)`.
pub static PROPERTY_SUITE_V1: OfxPropertySuiteV1 = OfxPropertySuiteV1 {
    prop_set_pointer: Some(prop_set_pointer),
    prop_set_string: Some(prop_set_string),
    prop_set_double: Some(prop_set_double),
    prop_set_int: Some(prop_set_int),
    prop_set_pointer_n: Some(prop_set_pointer_n),
    prop_set_string_n: Some(prop_set_string_n),
    prop_set_double_n: Some(prop_set_double_n),
    prop_set_int_n: Some(prop_set_int_n),
    prop_get_pointer: Some(prop_get_pointer),
    prop_get_string: Some(prop_get_string),
    prop_get_double: Some(prop_get_double),
    prop_get_int: Some(prop_get_int),
    prop_get_pointer_n: Some(prop_get_pointer_n),
    prop_get_string_n: Some(prop_get_string_n),
    prop_get_double_n: Some(prop_get_double_n),
    prop_get_int_n: Some(prop_get_int_n),
    prop_reset: Some(prop_reset),
    prop_get_dimension: Some(prop_get_dimension),
};

unsafe fn set_from_handle<'a>(handle: OfxPropertySetHandle) -> Option<&'a mut PropertySet> {
    unsafe { handle.cast::<PropertySet>().as_mut() }
}

unsafe fn key_from_ptr<'a>(property: *const c_char) -> Option<&'a str> {
    if property.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(property) }.to_str().ok()
}

unsafe extern "C" fn prop_set_pointer(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *mut c_void,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let Some(key) = (unsafe { key_from_ptr(property) }) else {
        return STAT_ERR_VALUE;
    };
    set.set_pointer(key, value);
    STAT_OK
}

unsafe extern "C" fn prop_set_string(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *const c_char,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let (Some(key), false) = (unsafe { key_from_ptr(property) }, value.is_null()) else {
        return STAT_ERR_VALUE;
    };
    let value = unsafe { CStr::from_ptr(value) };
    set.strings.insert(key.to_owned(), value.to_owned());
    STAT_OK
}

unsafe extern "C" fn prop_set_double(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: f64,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let Some(key) = (unsafe { key_from_ptr(property) }) else {
        return STAT_ERR_VALUE;
    };
    set.set_double(key, value);
    STAT_OK
}

unsafe extern "C" fn prop_set_int(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: c_int,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let Some(key) = (unsafe { key_from_ptr(property) }) else {
        return STAT_ERR_VALUE;
    };
    set.set_int(key, value);
    STAT_OK
}

unsafe extern "C" fn prop_get_pointer(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *mut *mut c_void,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let found = unsafe { key_from_ptr(property) }.and_then(|key| set.pointer(key));
    let (Some(out), Some(ptr)) = (unsafe { value.as_mut() }, found) else {
        return STAT_ERR_VALUE;
    };
    *out = ptr;
    STAT_OK
}

unsafe extern "C" fn prop_get_string(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *mut *mut c_char,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let found = unsafe { key_from_ptr(property) }.and_then(|key| set.string(key));
    let (Some(out), Some(s)) = (unsafe { value.as_mut() }, found) else {
        return STAT_ERR_VALUE;
    };
    // Points at storage inside the set; stable until the key is rewritten
    // or the set is dropped.
    *out = s.as_ptr().cast_mut();
    STAT_OK
}

unsafe extern "C" fn prop_get_double(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *mut f64,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let found = unsafe { key_from_ptr(property) }.and_then(|key| set.double(key));
    let (Some(out), Some(v)) = (unsafe { value.as_mut() }, found) else {
        return STAT_ERR_VALUE;
    };
    *out = v;
    STAT_OK
}

unsafe extern "C" fn prop_get_int(
    handle: OfxPropertySetHandle,
    property: *const c_char,
    _index: c_int,
    value: *mut c_int,
) -> OfxStatus {
    let Some(set) = (unsafe { set_from_handle(handle) }) else {
        return STAT_ERR_BAD_HANDLE;
    };
    let found = unsafe { key_from_ptr(property) }.and_then(|key| set.int(key));
    let (Some(out), Some(v)) = (unsafe { value.as_mut() }, found) else {
        return STAT_ERR_VALUE;
    };
    *out = v;
    STAT_OK
}

// Array variants are not needed by the effects this host drives; stubs
// keep the table complete for plugins that probe them.

unsafe extern "C" fn prop_set_pointer_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut *mut c_void,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_set_string_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut *const c_char,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_set_double_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut f64,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_set_int_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut c_int,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_get_pointer_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut *mut c_void,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_get_string_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut *mut c_char,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_get_double_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut f64,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_get_int_n(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    _count: c_int,
    _value: *mut c_int,
) -> OfxStatus {
    abi::STAT_ERR_UNSUPPORTED
}

unsafe extern "C" fn prop_reset(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
) -> OfxStatus {
    STAT_OK
}

unsafe extern "C" fn prop_get_dimension(
    _handle: OfxPropertySetHandle,
    _property: *const c_char,
    count: *mut c_int,
) -> OfxStatus {
    if let Some(count) = unsafe { count.as_mut() } {
        *count = 1;
    }
    STAT_OK
}
