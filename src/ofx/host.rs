//! Dynamic loading and dispatch of image-effect plugins.
//!
//! The host is a process-wide singleton: the plugin ABI hands every
//! plugin the same `OfxHost` pointer through `setHost`, so there can be
//! only one. `load_plugin`/`shutdown` are expected to be driven from a
//! single coordinating thread; `render_in_place` only ever reads the
//! library list and may be called concurrently from render workers.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::OnceLock;

use libloading::Library;
use parking_lot::RwLock;

use crate::foundation::error::{CutlineError, CutlineResult};
use crate::ofx::abi::{
    self, OfxGetNumberOfPluginsFn, OfxGetPluginFn, OfxHost, OfxPropertySetHandle,
};
use crate::ofx::property::{PROPERTY_SUITE_V1, PropertySet};

const SYM_GET_NUMBER_OF_PLUGINS: &[u8] = b"OfxGetNumberOfPlugins\0";
const SYM_GET_PLUGIN: &[u8] = b"OfxGetPlugin\0";

pub struct PluginHost {
    block: Box<HostBlock>,
    libraries: Vec<LoadedLibrary>,
}

/// Heap-pinned so the `OfxHost` pointer handed out through `setHost`
/// stays valid for the life of the process.
struct HostBlock {
    properties: PropertySet,
    host: OfxHost,
}

struct LoadedLibrary {
    library: Library,
    path: PathBuf,
    plugin_count: c_int,
}

// The raw pointers inside `HostBlock` refer to the block itself and to
// the 'static suite table; all mutation happens under the singleton's
// RwLock.
unsafe impl Send for PluginHost {}
unsafe impl Sync for PluginHost {}

unsafe extern "C" fn fetch_suite(
    _host: OfxPropertySetHandle,
    suite_name: *const c_char,
    _suite_version: c_int,
) -> *const c_void {
    if suite_name.is_null() {
        return ptr::null();
    }
    let name = unsafe { CStr::from_ptr(suite_name) };
    if name == abi::PROPERTY_SUITE_NAME {
        ptr::from_ref(&PROPERTY_SUITE_V1).cast()
    } else {
        ptr::null()
    }
}

impl PluginHost {
    fn new() -> Self {
        let mut properties = PropertySet::named("CutlineHostProperties");
        properties.set_string(abi::PROP_NAME, "cutline");
        properties.set_string(abi::PROP_LABEL, "Cutline");

        let mut block = Box::new(HostBlock {
            properties,
            host: OfxHost {
                host: ptr::null_mut(),
                fetch_suite: Some(fetch_suite),
            },
        });
        block.host.host = block.properties.handle();

        Self {
            block,
            libraries: Vec::new(),
        }
    }

    /// Load a plugin library and run every contained plugin through
    /// `setHost` -> `Load` -> `Describe`. A failed load leaves the host
    /// unchanged.
    pub fn load(&mut self, path: &Path) -> bool {
        match self.try_load(path) {
            Ok(count) => {
                log::info!(
                    "loaded {count} image-effect plugin(s) from '{}'",
                    path.display()
                );
                true
            }
            Err(err) => {
                log::warn!("plugin load failed for '{}': {err}", path.display());
                false
            }
        }
    }

    fn try_load(&mut self, path: &Path) -> CutlineResult<c_int> {
        let library = unsafe { Library::new(path) }
            .map_err(|e| CutlineError::plugin_load(format!("{}: {e}", path.display())))?;

        let plugin_count = {
            let get_count = unsafe { library.get::<OfxGetNumberOfPluginsFn>(SYM_GET_NUMBER_OF_PLUGINS) }
                .map_err(|e| CutlineError::plugin_symbol(format!("OfxGetNumberOfPlugins: {e}")))?;
            let get_plugin = unsafe { library.get::<OfxGetPluginFn>(SYM_GET_PLUGIN) }
                .map_err(|e| CutlineError::plugin_symbol(format!("OfxGetPlugin: {e}")))?;

            let count = unsafe { get_count() };
            for nth in 0..count {
                let plugin = unsafe { get_plugin(nth) };
                if plugin.is_null() {
                    continue;
                }
                unsafe {
                    if let Some(set_host) = (*plugin).set_host {
                        set_host(&mut self.block.host);
                    }
                    if let Some(entry) = (*plugin).main_entry {
                        entry(
                            abi::ACTION_LOAD.as_ptr(),
                            ptr::null(),
                            ptr::null_mut(),
                            ptr::null_mut(),
                        );
                        entry(
                            abi::ACTION_DESCRIBE.as_ptr(),
                            ptr::null(),
                            ptr::null_mut(),
                            ptr::null_mut(),
                        );
                    }
                }
            }
            count
        };

        self.libraries.push(LoadedLibrary {
            library,
            path: path.to_path_buf(),
            plugin_count,
        });
        Ok(plugin_count)
    }

    /// Dispatch the render action of the first plugin in the library
    /// matching `plugin_path`, operating in place on `buf`. A path with
    /// no loaded library is a silent no-op; a non-OK status is recorded
    /// but never propagated.
    pub fn render_in_place(&self, plugin_path: &str, buf: &mut [u8], width: u32, height: u32) {
        if buf.len() < width as usize * height as usize * 4 {
            log::warn!("effect buffer smaller than {width}x{height} RGBA; skipping render");
            return;
        }
        let Some(lib) = self
            .libraries
            .iter()
            .find(|l| l.path == Path::new(plugin_path) && l.plugin_count > 0)
        else {
            return;
        };
        let Ok(get_plugin) = (unsafe { lib.library.get::<OfxGetPluginFn>(SYM_GET_PLUGIN) }) else {
            return;
        };
        let plugin = unsafe { get_plugin(0) };
        if plugin.is_null() {
            return;
        }
        let Some(entry) = (unsafe { (*plugin).main_entry }) else {
            return;
        };

        let mut args = PropertySet::named("RenderArgs");
        args.set_pointer(abi::PROP_SRC_BUFFER, buf.as_mut_ptr().cast());
        args.set_pointer(abi::PROP_DST_BUFFER, buf.as_mut_ptr().cast());
        args.set_int(abi::PROP_WIDTH, width as c_int);
        args.set_int(abi::PROP_HEIGHT, height as c_int);
        args.set_int(abi::PROP_ROW_BYTES, (width * 4) as c_int);

        let status = unsafe { entry(abi::ACTION_RENDER.as_ptr(), ptr::null(), args.handle(), ptr::null_mut()) };
        if status != abi::STAT_OK {
            log::debug!("plugin '{plugin_path}' render returned status {status}");
        }
    }

    pub fn loaded_library_count(&self) -> usize {
        self.libraries.len()
    }

    /// Unload every library. Idempotent.
    pub fn shutdown(&mut self) {
        self.libraries.clear();
    }
}

fn singleton() -> &'static RwLock<PluginHost> {
    static HOST: OnceLock<RwLock<PluginHost>> = OnceLock::new();
    HOST.get_or_init(|| RwLock::new(PluginHost::new()))
}

/// Eagerly create the singleton host. Optional — every entry point below
/// initializes on demand.
pub fn initialize() {
    let _ = singleton();
}

/// Load an image-effect plugin library. Returns `false` (and logs) on any
/// failure; loaded state is unchanged in that case.
pub fn load_plugin(path: impl AsRef<Path>) -> bool {
    singleton().write().load(path.as_ref())
}

/// Run the enabled effect at `plugin_path` in place over an RGBA8 buffer.
pub fn render_in_place(plugin_path: &str, buf: &mut [u8], width: u32, height: u32) {
    singleton().read().render_in_place(plugin_path, buf, width, height)
}

pub fn loaded_library_count() -> usize {
    singleton().read().loaded_library_count()
}

/// Unload all plugin libraries. Safe to call repeatedly.
pub fn shutdown() {
    singleton().write().shutdown()
}
