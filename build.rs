fn main() {
    // Note: Using CARGO_CFG_TARGET_OS because #[cfg()] attributes in build.rs
    // check the HOST platform, not the target platform
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "windows" {
        // libgit2-sys needs the security and registry functions from advapi32
        println!("cargo:rustc-link-lib=advapi32");
    }
}
