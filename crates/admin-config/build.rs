fn main() {
    // option_env!() values are baked in at compile time; rebuild when they change.
    println!("cargo:rerun-if-env-changed=CMS_ADMIN_API_URL");
    println!("cargo:rerun-if-env-changed=CMS_ADMIN_PUBLIC_TOKEN");
}
