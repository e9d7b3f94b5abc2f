fn main() {
  // With the virtual SDK enabled the vendor library is never linked.
  #[cfg(not(feature = "test"))]
  link_vendor_sdk();
}

#[cfg(not(feature = "test"))]
fn link_vendor_sdk() {
  use std::env;
  use std::path::PathBuf;

  println!("cargo:rerun-if-env-changed=EDSDK_DIR");

  let edsdk_dir = env::var_os("EDSDK_DIR").map(PathBuf::from);

  if cfg!(target_os = "macos") {
    let framework_dir = edsdk_dir.unwrap_or_else(|| PathBuf::from("/Library/Frameworks"));
    println!("cargo:rustc-link-search=framework={}", framework_dir.display());
    println!("cargo:rustc-link-lib=framework=EDSDK");
    println!("cargo:rustc-link-arg=-Wl,-rpath,{}", framework_dir.display());
  } else if cfg!(target_os = "windows") {
    // Default install prefix of the v13.x SDK package.
    let sdk_root = edsdk_dir.unwrap_or_else(|| PathBuf::from("C:\\EDSDKv132010W"));
    println!(
      "cargo:rustc-link-search=native={}",
      sdk_root.join("Windows").join("EDSDK_64").join("Library").display()
    );
    println!("cargo:rustc-link-lib=EDSDK");
  } else {
    println!(
      "cargo:warning=the Canon EDSDK is only distributed for Windows and macOS; \
       linking will fail on this target (build with --features test for the virtual SDK)"
    );
  }
}
