/// Controls how frames are decoded and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    /// When true, objects carrying fields their shape does not declare are rejected.
    pub strict_mode: bool,
    /// Maximum number of field violations collected for a single object.
    pub max_violations: usize,
    /// Maximum bytes accepted for a single raw frame before decoding.
    pub max_frame_bytes: usize,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            max_violations: 32,
            max_frame_bytes: 1024 * 1024,
        }
    }
}
