fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Stamp the image with its build time for the dfu.status version and
    // the boot banner.
    let built = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default();
    println!("cargo:rustc-env=KIDTRACKER_BUILT={built}");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
