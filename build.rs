fn main() {
    // Host builds (tests) compile without the ESP-IDF toolchain; the
    // sysenv propagation only exists when the espidf feature is active.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
