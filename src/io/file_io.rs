//! File primitives for the batch dispatcher.
//!
//! - [`dst_filename`]    — derives the output name by stripping the `.lz4` suffix
//! - [`source_mode`]     — permission bits of a source file
//! - [`create_dst_file`] — creates the output with the source's permission bits
//! - [`close_file`]      — closes a descriptor and reports the close status
//!
//! Dropping a [`File`] silently discards the result of `close(2)`; every
//! descriptor the dispatcher opens is released through [`close_file`] instead
//! so that deferred write errors (NFS, quota) reach the caller.

use std::fs::{File, Metadata, OpenOptions};
use std::io;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Display name used for standard input in diagnostics.
pub const STDIN_MARK: &str = "stdin";

/// Display name used for standard output in diagnostics.
pub const STDOUT_MARK: &str = "stdout";

// ---------------------------------------------------------------------------
// Destination naming
// ---------------------------------------------------------------------------

/// Returns `src` with `suffix` removed from its end.
///
/// Returns `None` when `src` does not end with `suffix`, or when nothing
/// would remain after stripping it.
pub fn dst_filename<'a>(src: &'a str, suffix: &str) -> Option<&'a str> {
    match src.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !stem.ends_with(std::path::MAIN_SEPARATOR) => Some(stem),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Mode preservation
// ---------------------------------------------------------------------------

/// Permission bits (`mode & 0o7777`) of a source file.
#[cfg(unix)]
pub fn source_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

/// Non-Unix targets only carry a read-only flag.
#[cfg(not(unix))]
pub fn source_mode(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Creates (or truncates) `path` for writing with permission bits `mode`.
///
/// The bits are applied again after creation: `open(2)` masks them with the
/// process umask, and the destination must carry exactly the source's mode.
pub fn create_dst_file(path: &str, mode: u32) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(mode);
    }
    let file = opts.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_readonly(mode & 0o222 == 0);
        file.set_permissions(perms)?;
    }

    Ok(file)
}

// ---------------------------------------------------------------------------
// Close
// ---------------------------------------------------------------------------

/// Closes `file`, returning the status of `close(2)`.
#[cfg(unix)]
pub fn close_file(file: File) -> io::Result<()> {
    use std::os::unix::io::IntoRawFd;
    let fd = file.into_raw_fd();
    // SAFETY: `fd` was released by `into_raw_fd` above and is closed exactly once.
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Closes `file`. Close status is not observable on this target.
#[cfg(not(unix))]
pub fn close_file(file: File) -> io::Result<()> {
    drop(file);
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
