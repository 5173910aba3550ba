use thiserror::Error;
use tracing::{debug, warn};
use x11rb::protocol::xproto::{
    FREE_COLORS_REQUEST, GET_GEOMETRY_REQUEST, GET_WINDOW_ATTRIBUTES_REQUEST, QUERY_COLORS_REQUEST,
    QUERY_TREE_REQUEST,
};
use x11rb::protocol::ErrorKind;
use x11rb::x11_utils::X11Error;

/// Failures that end a color grab.
///
/// The `Display` text of each variant is the exact message printed before
/// the process exits, so it must not change.
#[derive(Error, Debug)]
pub enum GrabError {
    #[error("failed to open dpy")]
    Display { reason: String },

    #[error("failed grabbing mouse")]
    PointerGrab,

    #[error("failed grabbing color")]
    NoColor { reason: String },
}

impl GrabError {
    pub fn no_color(reason: impl Into<String>) -> Self {
        Self::NoColor { reason: reason.into() }
    }

    /// Process exit status for this failure.
    pub fn exit_status(&self) -> u8 {
        1
    }

    /// The detail behind the fixed message, for diagnostics.
    pub fn reason(&self) -> &str {
        match self {
            Self::Display { reason } | Self::NoColor { reason } => reason,
            Self::PointerGrab => "pointer already grabbed or grab refused",
        }
    }
}

/// How a protocol error raised during a server call was treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Expected while walking windows that may vanish under us.
    Benign,
    /// Acknowledged, but the caller must treat its call as failed.
    Unexpected,
}

/// Protocol error handler injected into the display connection.
///
/// Nothing it sees is fatal. The allow-list only decides whether the error
/// is routine noise or worth a warning.
#[derive(Debug, Clone, Default)]
pub struct ErrorFilter {
    _private: (),
}

impl ErrorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, major_opcode: u8, kind: ErrorKind) -> Disposition {
        if kind == ErrorKind::Alloc {
            return Disposition::Benign;
        }
        if kind == ErrorKind::Access && major_opcode == FREE_COLORS_REQUEST {
            return Disposition::Benign;
        }

        let allowed = match major_opcode {
            GET_GEOMETRY_REQUEST => kind == ErrorKind::Drawable,
            GET_WINDOW_ATTRIBUTES_REQUEST | QUERY_TREE_REQUEST => kind == ErrorKind::Window,
            QUERY_COLORS_REQUEST => kind == ErrorKind::Value,
            _ => false,
        };

        if allowed {
            Disposition::Benign
        } else {
            Disposition::Unexpected
        }
    }

    pub fn handle(&self, error: &X11Error) -> Disposition {
        let disposition = self.classify(error.major_opcode, error.error_kind);
        match disposition {
            Disposition::Benign => debug!(
                "Ignoring {:?} from request {}",
                error.error_kind, error.major_opcode
            ),
            Disposition::Unexpected => warn!(
                "X11 error {:?} from request {} (bad value {})",
                error.error_kind, error.major_opcode, error.bad_value
            ),
        }
        disposition
    }
}

/// Log and ignore a failed cleanup step.
pub fn log_and_ignore(ok: bool, operation: &str) {
    if !ok {
        debug!("Ignoring failure in {}", operation);
    }
}

/// Log warning for a non-critical step that did not succeed.
pub fn log_warn(ok: bool, operation: &str) -> bool {
    if !ok {
        warn!("Warning in {}: request failed", operation);
    }
    ok
}
