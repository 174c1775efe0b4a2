pub type Result<T> = std::result::Result<T, GfxError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    #[error("{0}")]
    OutOfRange(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("malformed compressed data: {0}")]
    MalformedData(String),
    #[error("{0}")]
    TruncatedData(String),
}

impl GfxError {
    pub(crate) fn out_of_range(what: &str) -> Self {
        GfxError::OutOfRange(format!("{what} index out of range"))
    }
}

// Like anyhow's `ensure!`, but producing a `GfxError` of the given kind.
macro_rules! ensure_gfx {
    ($cond:expr, $kind:ident, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::GfxError::$kind(format!($($arg)+)));
        }
    };
}

pub(crate) use ensure_gfx;
