//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tunecart_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("tunecart_core ping={}", tunecart_core::ping());
    println!("tunecart_core version={}", tunecart_core::core_version());
}
