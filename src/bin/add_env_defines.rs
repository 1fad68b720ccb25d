//! PlatformIO pre-build hook.
//!
//! Most `.env` values reach the firmware through `build-with-env`. `ROOT_CA`
//! is the exception: it spans multiple lines, which does not survive being
//! passed as a `-D` define, so it is never injected and the default in
//! `src/secrets.cpp` is used instead. This hook only says so.
//!
//! Whatever the host passes on the command line is ignored.

const NOTICE: &str = concat!(
    "[add_env_defines] ROOT_CA skipped: multiline values are not injected as defines ",
    "(keep the default or edit src/secrets.cpp)",
);

fn main() {
    println!("{NOTICE}");
}
