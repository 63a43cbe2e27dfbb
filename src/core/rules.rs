//! Manifest conventions for one language.

use serde::{Deserialize, Serialize};

/// The naming conventions used when generating and reclassifying
/// manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Compilation-unit file name suffix, e.g. `.java`.
    pub suffix: String,

    /// Manifest file name written into each unit directory.
    pub manifest_name: String,

    /// Rule that declares a library target.
    pub library_kind: String,

    /// Rule that declares a test target.
    pub test_kind: String,

    /// Default visibility label for every generated package.
    pub visibility: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            suffix: ".java".to_string(),
            manifest_name: "BUILD".to_string(),
            library_kind: "java_library".to_string(),
            test_kind: "java_test".to_string(),
            visibility: "//:__subpackages__".to_string(),
        }
    }
}

impl RuleSet {
    /// The non-recursive source glob covering every unit in one directory.
    pub fn source_glob(&self) -> String {
        format!("*{}", self.suffix)
    }
}
