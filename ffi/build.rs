//! Generate `posts_ffi.h` into `OUT_DIR` for C and mobile hosts. The full
//! path is exported to the crate as the `POSTS_FFI_HEADER` env var.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_else(|_| ".".to_string()));
    let header = out_dir.join("posts_ffi.h");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("POSTS_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&header);
            println!("cargo:rustc-env=POSTS_FFI_HEADER={}", header.display());
        }
        Err(err) => println!("cargo:warning=cbindgen failed: {err}"),
    }
}
