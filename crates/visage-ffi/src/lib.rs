//! C ABI boundary for host applications (game engines, native apps).
//!
//! Raw-pointer marshaling lives only in this crate; everything beneath it is
//! safe Rust returning typed results. The boundary collapses the internal
//! error taxonomy into a boolean because the host has no structured error
//! channel; diagnostics go to the log.

#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::os::raw::c_char;
use std::sync::{Once, RwLock};

use tracing::{info, warn};
use visage_core::{AdapterConfig, Classifier, OrtBackend, PipelineError, NUM_CLASSES};

/// Process-wide classifier handle. Written by [`visage_load_model`],
/// read-shared by inference calls.
static CLASSIFIER: RwLock<Option<Classifier<OrtBackend>>> = RwLock::new(None);

static DIAGNOSTICS: Once = Once::new();

/// Install the log subscriber once. A host that already owns the global
/// subscriber wins; the failure is ignored.
fn init_diagnostics() {
    DIAGNOSTICS.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_target(false)
            .try_init();
    });
}

/// Discover and load the classification model.
///
/// Re-entrant: calling again re-runs discovery and replaces the handle on
/// success. Failure leaves the previous handle (if any) in place and is
/// reported on the diagnostic channel only.
#[unsafe(no_mangle)]
pub extern "C" fn visage_load_model() {
    init_diagnostics();

    let config = AdapterConfig::from_env();
    match visage_core::load_classifier(&config) {
        Ok(classifier) => match CLASSIFIER.write() {
            Ok(mut handle) => {
                *handle = Some(classifier);
                info!("model handle ready");
            }
            Err(_) => warn!("model handle lock poisoned; load discarded"),
        },
        Err(e) => warn!("model load failed: {}", e),
    }
}

/// Classify one encoded image.
///
/// `bytes` must point to `len` readable bytes; `results` must point to
/// storage for exactly [`NUM_CLASSES`] floats. On success writes the scores
/// in model-definition order and returns `true`. On any failure returns
/// `false` and leaves `results` untouched. Never writes more than
/// [`NUM_CLASSES`] values.
#[unsafe(no_mangle)]
pub extern "C" fn visage_process_image(
    bytes: *const u8,
    len: usize,
    results: *mut f32,
) -> bool {
    if bytes.is_null() || results.is_null() {
        return false;
    }
    let data = unsafe { std::slice::from_raw_parts(bytes, len) };

    let handle = match CLASSIFIER.read() {
        Ok(handle) => handle,
        Err(_) => {
            warn!("model handle lock poisoned");
            return false;
        }
    };
    let Some(classifier) = handle.as_ref() else {
        warn!("{}", PipelineError::ModelNotLoaded);
        return false;
    };

    match classifier.classify(data) {
        Ok(scores) => {
            let out = unsafe { std::slice::from_raw_parts_mut(results, NUM_CLASSES) };
            out.copy_from_slice(scores.as_array());
            true
        }
        Err(e) => {
            warn!("inference request failed: {}", e);
            false
        }
    }
}

/// Static version string for host-side sanity checks.
#[unsafe(no_mangle)]
pub extern "C" fn visage_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
