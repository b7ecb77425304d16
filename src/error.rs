//! Render error types.

use thiserror::Error;

/// Fatal failure of a render call. Nothing is output when one is returned.
///
/// URL rejections are not errors: they drop the offending attribute or
/// element and are listed in the [`DropReport`](crate::sanitize::DropReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("input is {len} bytes, over the {max} byte limit")]
    InputTooLarge { len: usize, max: usize },

    #[error("elements nested deeper than {max} levels")]
    NestingTooDeep { max: usize },

    #[error("malformed input: {0}")]
    MalformedInput(String),
}
