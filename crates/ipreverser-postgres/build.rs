#![forbid(unsafe_code)]

/// `embed_migrations!` cannot track the migration directory on its own, so a
/// change to an SQL file alone would not rebuild the crate. Rerun explicitly.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
