//! Common constants used throughout recipegen.

/// Namespace applied to values that carry no `prefix:` of their own.
pub const DEFAULT_NAMESPACE: &str = "minecraft:";

/// System placeholders filled from the combination's namespace rather than a rule.
pub const MODID: &str = "modid";
pub const MODID_SAFE: &str = "modid_safe";
pub const RESERVED_PLACEHOLDERS: [&str; 2] = [MODID, MODID_SAFE];

/// Key of the `extra` table applied to every value of a rule.
pub const WILDCARD_KEY: &str = "*";

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_TEMPLATE_DIR: &str = "./templates";

/// Pattern used when scanning a directory for templates.
pub const TEMPLATE_PATTERN: &str = "*.json";
