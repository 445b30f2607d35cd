// src/supervise/terminal.rs

//! Terminal echo restoration for freshly started workers.
//!
//! A worker killed mid-prompt can leave the terminal with echo disabled;
//! the next worker turns it back on.

use std::io;

/// Re-enable terminal echo on stdin if it is a tty with echo turned off.
#[cfg(unix)]
pub fn ensure_echo_on() -> io::Result<()> {
    use std::mem::MaybeUninit;
    use std::os::fd::AsRawFd;

    let fd = io::stdin().as_raw_fd();

    // SAFETY: `isatty` only inspects the descriptor.
    if unsafe { libc::isatty(fd) } != 1 {
        return Ok(());
    }

    let mut attrs = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: `attrs` points to writable storage for one `termios`.
    if unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `tcgetattr` succeeded and filled the struct.
    let mut attrs = unsafe { attrs.assume_init() };

    if attrs.c_lflag & libc::ECHO == 0 {
        attrs.c_lflag |= libc::ECHO;
        // SAFETY: `attrs` is a valid, initialised `termios`.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

#[cfg(not(unix))]
pub fn ensure_echo_on() -> io::Result<()> {
    Ok(())
}
