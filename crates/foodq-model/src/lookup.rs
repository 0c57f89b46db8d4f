use std::collections::HashMap;

/// Case-insensitive name index that preserves the original spelling.
///
/// Column headers in product exports are not consistently cased, so field
/// names are matched on their lowercase form.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveLookup {
    map: HashMap<String, String>,
}

impl CaseInsensitiveLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.trim().to_ascii_lowercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Original spelling for `name`, if known.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.trim().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
