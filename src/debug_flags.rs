use std::sync::OnceLock;

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "on" | "ON"))
        .unwrap_or(default)
}

// Per-byte decode traces (very noisy, also needs RUST_LOG=trace)
pub fn trace_spi() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| env_flag("TRACE_SPI", false))
}

// Drop bytes clocked in while chip-select is deasserted instead of decoding them.
pub fn strict_framing() -> bool {
    static ON: OnceLock<bool> = OnceLock::new();
    *ON.get_or_init(|| env_flag("STRICT_SPI_FRAMING", false))
}
