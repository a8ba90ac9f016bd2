//! Project identifiers.
//!
//! Internally every GUID is kept in canonical form: lower case, hyphenated,
//! 36 characters, no braces. Writers decorate it (`{UPPER-CASE}`) on output.

use std::collections::BTreeMap;

use uuid::Uuid;

/// Well known project type GUID of native Visual C++ projects inside solutions
pub const VISUAL_CPP_PROJECT_TYPE: &str = "8bc9ceb8-8b4a-11d0-8d11-00a0c91bc942";

/// Converts any textual GUID representation into canonical form.
/// Text that is not a GUID is trimmed of braces and lower cased.
#[must_use]
pub fn canonicalize(text: &str) -> String {
    let trimmed = text.trim().trim_start_matches('{').trim_end_matches('}');
    match Uuid::parse_str(trimmed) {
        Ok(id) => id.hyphenated().to_string(),
        Err(_) => trimmed.to_lowercase(),
    }
}

/// Formats canonical GUID the way Visual Studio files spell it, i.e. `{XXXXXXXX-...}`
#[must_use]
pub fn decorate(guid: &str) -> String {
    format!("{{{}}}", guid.to_uppercase())
}

/// Allocates a random GUID in canonical form
#[must_use]
pub fn generate() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Name to GUID mapping that keeps identifiers stable across conversions.
///
/// Known GUIDs usually come from a previously generated solution. A name is
/// looked up as is, then with `.dll` suffix and only if both are missing
/// a new random GUID is allocated and remembered.
#[derive(Debug, Default, Clone)]
pub struct GuidRegistry {
    known: BTreeMap<String, String>,
}

impl GuidRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, guid: &str) {
        self.known.insert(name.to_owned(), canonicalize(guid));
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.known
            .get(name)
            .or_else(|| self.known.get(&format!("{name}.dll")))
            .map(String::as_str)
    }

    /// Returns known GUID of the name or allocates a new one
    pub fn resolve(&mut self, name: &str) -> String {
        if let Some(guid) = self.lookup(name) {
            return guid.to_owned();
        }
        let guid = generate();
        self.known.insert(name.to_owned(), guid.clone());
        guid
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
