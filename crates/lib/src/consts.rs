/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "apebuild.toml";

/// Suffix of every object written by the packaging tool.
pub const ARTIFACT_SUFFIX: &str = ".zip.o";

/// Number of decimal digits in an artifact token.
pub const TOKEN_WIDTH: usize = 6;

/// Exclusive upper bound of artifact tokens (`10^TOKEN_WIDTH`).
pub const TOKEN_SPACE: u32 = 1_000_000;

pub const DEFAULT_PACKAGER: &str = "zipobj";
pub const DEFAULT_COMPILER: &str = "cosmoc++";
pub const DEFAULT_STAGING_DIR: &str = "build_dir";

/// Environment variables that override the configured tool programs.
pub const PACKAGER_ENV: &str = "APEBUILD_PACKAGER";
pub const COMPILER_ENV: &str = "APEBUILD_COMPILER";
