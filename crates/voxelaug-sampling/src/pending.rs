//! Pending lazy-operation checks.

use voxelaug_array::NumericBackend;

use crate::error::SamplingError;

/// Checks whether an input still carries unresolved lazy operations.
///
/// Sampling over an array whose geometry is not final produces coordinates
/// in the wrong frame. By default this is reported as a warning and the
/// computation proceeds (the caller can recover by evaluating the pending
/// queue eagerly and re-running); with `strict` the check fails instead.
///
/// # Arguments
///
/// * `array` - The input to check.
/// * `name` - Name of the consuming operation, included in the report.
/// * `strict` - Whether a pending input is an error rather than a warning.
pub fn check_pending_ops<B: NumericBackend>(
    array: &B,
    name: &'static str,
    strict: bool,
) -> Result<(), SamplingError> {
    let count = array.pending_ops();
    if count == 0 {
        return Ok(());
    }
    if strict {
        return Err(SamplingError::PendingOperations { name, count });
    }
    log::warn!(
        "the input of {} has {} pending operations, results may be inaccurate",
        name,
        count
    );
    Ok(())
}
