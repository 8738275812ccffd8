use anyhow::Error;
use std::io;

/// Returns `true` if the error chain bottoms out in a broken pipe.
#[inline]
pub fn is_broken_pipe(err: &Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}
