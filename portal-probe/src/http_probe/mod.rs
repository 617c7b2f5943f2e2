pub mod probe;
pub mod result;
mod trust;

use std::fmt::Write;

pub mod prelude {
    pub use super::probe::{ProbeKind, probe_url};
    pub use super::result::{FAILED_CODE, ProbeClass, ProbeOutcome, SUCCESS_CODE};
}

/// Flatten an error and its sources into one loggable string.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
