use std::fs;
use std::path::PathBuf;

fn main() {
    let manifest_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("cargo sets the manifest dir"));
    let version_path = manifest_dir
        .ancestors()
        .nth(2)
        .expect("asciiview-app lives two levels under the workspace root")
        .join("VERSION");

    println!("cargo:rerun-if-changed={}", version_path.display());

    let raw_version =
        fs::read_to_string(&version_path).expect("workspace VERSION file should be readable");
    let version = raw_version.trim();
    assert!(
        !version.is_empty(),
        "workspace VERSION file must not be empty"
    );

    println!("cargo:rustc-env=ASCIIVIEW_VERSION={version}");
}
