extern crate version_check;

static MIN_RUSTC: &str = "1.61.0";
static FFTSOLVE_DESC: &str = "fftsolve";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    match version_check::is_min_version(MIN_RUSTC) {
        Some(true) => {}
        Some(false) => panic!(
            "Unsupported rustc version: {}, {} needs at least: {}",
            version_check::Version::read()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            FFTSOLVE_DESC,
            MIN_RUSTC
        ),
        None => panic!("Unable to determine rustc version."),
    };
}
