fn main() {
    // Propagate ESP-IDF sysenv (paths, linker args) when building for
    // the espidf target; on host builds this is a no-op.
    embuild::espidf::sysenv::output();
}
