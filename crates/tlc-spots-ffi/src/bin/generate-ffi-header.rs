//! Regenerate `include/tlc_spots.h` from the FFI crate.
//!
//! Run with `cargo run -p tlc-spots-ffi --features generate-header`.

fn main() {
    let crate_dir = env!("CARGO_MANIFEST_DIR");
    let config = cbindgen::Config::from_root_or_default(crate_dir);

    cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(config)
        .generate()
        .expect("generate C header")
        .write_to_file(format!("{crate_dir}/include/tlc_spots.h"));
}
