use std::ffi::OsStr;
use std::process::Command;

/// Builds a [`Command`] and logs the command line at debug level.
pub fn cmd<I: AsRef<OsStr>>(
    name: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = I>,
) -> Command {
    let name = name.as_ref();
    let args: Vec<I> = args.into_iter().collect();
    log::debug!("exec: {}", command_line(name, &args));

    let mut c = Command::new(name);
    c.args(&args);
    c
}

/// Renders `bin args...` the way a user would type it, quoting arguments that
/// contain spaces.
pub fn command_line<I: AsRef<OsStr>>(bin: &OsStr, args: &[I]) -> String {
    let mut line = bin.to_string_lossy().into_owned();
    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        line.push(' ');
        if arg.contains(' ') {
            line.push_str(&format!("'{arg}'"));
        } else {
            line.push_str(&arg);
        }
    }
    line
}
