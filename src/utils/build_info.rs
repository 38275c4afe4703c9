/// Build facts embedded by `build.rs`; missing values read `unknown`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// `0.1.0 (abc1234, clean)`
    pub fn short(&self) -> String {
        format!("{} ({}, {})", self.version, self.git_hash, self.git_status)
    }

    pub fn rows(&self) -> [(&'static str, &'static str); 5] {
        [
            ("Built at", self.timestamp),
            ("Target", self.target),
            ("Profile", self.profile),
            ("Rustc", self.rustc),
            ("Git status", self.git_status),
        ]
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("VAAD_LEDGER_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("VAAD_LEDGER_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("VAAD_LEDGER_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("VAAD_LEDGER_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("VAAD_LEDGER_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("VAAD_LEDGER_BUILD_RUSTC").unwrap_or("unknown"),
    }
}
