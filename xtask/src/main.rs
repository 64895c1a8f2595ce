use std::env;

/// `cargo xtask bundle filter_one --release [--target <triple>]`
///
/// A `--target` triple gets its own target directory so cross builds don't clobber native ones.
fn main() -> nih_plug_xtask::Result<()> {
    let args: Vec<String> = env::args().collect();

    if let Some(triple) = args
        .iter()
        .position(|arg| arg == "--target")
        .and_then(|pos| args.get(pos + 1))
    {
        env::set_var("CARGO_TARGET_DIR", format!("target/{triple}"));
    }

    nih_plug_xtask::main()
}
