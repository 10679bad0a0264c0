//! Allocator housekeeping between benchmark iterations.

/// Returns freed heap memory to the operating system so that a timed run
/// does not inherit the previous run's fragmentation.
///
/// Only glibc exposes `malloc_trim`; on every other target this does nothing.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub fn quiesce_heap() {
    // SAFETY: malloc_trim only walks allocator state and takes no pointers.
    unsafe {
        libc::malloc_trim(0);
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
#[inline]
pub fn quiesce_heap() {}
