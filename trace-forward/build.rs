//! Build script for trace-forward
//!
//! Compiles the C trace shim. The shim owns every piece of code that touches a
//! `va_list`, since stable Rust cannot consume one.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/trace_shim.c");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let shim_src = manifest_dir.join("csrc").join("trace_shim.c");

    cc::Build::new()
        .file(&shim_src)
        .warnings(true)
        .flag_if_supported("-std=c99")
        .compile("trace_shim");

    // Lets the dynamic-source tests resolve the loopback hook from the running
    // test binary, the way a host resolves a globally loaded raylib.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("linux") {
        println!("cargo:rustc-link-arg-tests=-Wl,--export-dynamic");
    }
}
