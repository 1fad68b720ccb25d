use std::env;

/// Stands in for `pio` during integration tests.
///
/// Prints its arguments, working directory, and the variables named in
/// `MOCK_PIO_ECHO` (comma-separated), then exits with `MOCK_PIO_EXIT`.
fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    println!("mock-pio args: {}", args.join(" "));

    let cwd = env::current_dir().expect("Failed to read current directory");
    println!("mock-pio cwd: {}", cwd.display());

    if let Ok(keys) = env::var("MOCK_PIO_ECHO") {
        for key in keys.split(',').filter(|k| !k.is_empty()) {
            match env::var(key) {
                Ok(value) => println!("mock-pio env: {key}={value}"),
                Err(_) => println!("mock-pio env: {key} unset"),
            }
        }
    }

    let code = env::var("MOCK_PIO_EXIT")
        .ok()
        .and_then(|code| code.parse().ok())
        .unwrap_or(0);
    std::process::exit(code);
}
