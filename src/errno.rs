//! Access to the calling thread's `errno`.
//!
//! Every public logging entry point holds a [`Guard`] for its whole body, so
//! a caller that inspects `errno` right after a logging call sees the value it
//! had before the call.

#[cfg(any(
    target_os = "linux",
    target_os = "redox",
    target_os = "emscripten",
    target_os = "fuchsia",
    target_os = "l4re",
    target_os = "hurd"
))]
unsafe fn location() -> *mut libc::c_int {
    libc::__errno_location()
}

#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
unsafe fn location() -> *mut libc::c_int {
    libc::__errno()
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe fn location() -> *mut libc::c_int {
    libc::__error()
}

/// Returns the current `errno`.
#[inline]
#[must_use]
pub fn get() -> i32 {
    // SAFETY: the errno location is thread-local and always valid for reads.
    unsafe { *location() }
}

/// Sets `errno`.
#[inline]
pub fn set(code: i32) {
    // SAFETY: the errno location is thread-local and always valid for writes.
    unsafe {
        *location() = code;
    }
}

/// Restores the saved `errno` when dropped.
#[derive(Debug)]
#[must_use = "errno is restored when the guard is dropped"]
pub struct Guard {
    saved: i32,
}

impl Guard {
    /// Snapshot the current `errno`.
    #[inline]
    pub fn save() -> Self {
        Self { saved: get() }
    }

    /// The value that will be restored.
    #[inline]
    #[must_use]
    pub const fn saved(&self) -> i32 {
        self.saved
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        set(self.saved);
    }
}

/// Size of the buffer handed to `strerror_r`; longer descriptions are cut.
const STRERROR_BUF: usize = 128;

/// Human readable description of an OS error code, as `strerror(3)` prints it.
///
/// Writes into `out` without allocating and returns the written slice.
pub fn describe(code: i32, out: &mut DescribeBuf) -> &str {
    let _g = Guard::save();
    // SAFETY: `out` is writable for its full length and strerror_r
    // NUL-terminates on success.
    let rc = unsafe { libc::strerror_r(code, out.as_mut_ptr().cast(), out.len()) };
    let found = if rc == 0 {
        out.iter()
            .position(|&b| b == 0)
            .filter(|&n| core::str::from_utf8(&out[..n]).is_ok())
    } else {
        None
    };
    let len = match found {
        Some(n) => n,
        None => {
            let mut w = crate::format::LineBuf::<STRERROR_BUF>::new();
            let _ = core::fmt::Write::write_fmt(&mut w, format_args!("Unknown error: {code}"));
            let n = w.len();
            out[..n].copy_from_slice(w.as_str().as_bytes());
            n
        }
    };
    core::str::from_utf8(&out[..len]).unwrap_or("Unknown error")
}

/// Owned variant of [`describe`].
#[must_use]
pub fn strerror(code: i32) -> String {
    let mut buf = [0u8; STRERROR_BUF];
    describe(code, &mut buf).to_owned()
}

/// Buffer type accepted by [`describe`].
pub type DescribeBuf = [u8; STRERROR_BUF];
