//! Logging shim
//!
//! Routes the crate's log macros to `defmt` on embedded targets, to the
//! `log` crate on hosted targets, and to nothing when neither feature is
//! enabled. Format strings stick to `{}` and `{:?}` so both backends accept
//! them; the no-op variant still type-checks its arguments.

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
pub(crate) use defmt::{debug, error, info, trace, warn};

#[cfg(all(feature = "log", not(feature = "defmt")))]
#[allow(unused_imports)]
pub(crate) use log::{debug, error, info, trace, warn};

#[cfg(not(any(feature = "defmt", feature = "log")))]
mod noop {
    macro_rules! trace_noop {
        ($($arg:tt)*) => {{
            let _ = ::core::format_args!($($arg)*);
        }};
    }

    macro_rules! debug_noop {
        ($($arg:tt)*) => {{
            let _ = ::core::format_args!($($arg)*);
        }};
    }

    macro_rules! info_noop {
        ($($arg:tt)*) => {{
            let _ = ::core::format_args!($($arg)*);
        }};
    }

    macro_rules! warn_noop {
        ($($arg:tt)*) => {{
            let _ = ::core::format_args!($($arg)*);
        }};
    }

    macro_rules! error_noop {
        ($($arg:tt)*) => {{
            let _ = ::core::format_args!($($arg)*);
        }};
    }

    #[allow(unused_imports)]
    pub(crate) use debug_noop as debug;
    #[allow(unused_imports)]
    pub(crate) use error_noop as error;
    #[allow(unused_imports)]
    pub(crate) use info_noop as info;
    #[allow(unused_imports)]
    pub(crate) use trace_noop as trace;
    #[allow(unused_imports)]
    pub(crate) use warn_noop as warn;
}

#[cfg(not(any(feature = "defmt", feature = "log")))]
#[allow(unused_imports)]
pub(crate) use noop::{debug, error, info, trace, warn};
