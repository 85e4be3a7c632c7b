use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Delimiter line opening and closing a front-matter block.
pub const DELIMITER: &str = "---";

/// An ordered yaml key/value block. Typed accessors return `None`/empty on
/// missing keys or type mismatches; callers apply their own required-field
/// checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    map: IndexMap<String, Value>,
}

impl FieldMap {
    pub fn new() -> FieldMap {
        FieldMap::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Parse a yaml mapping. Empty input is an empty map, not an error.
    pub fn from_yaml(text: &str) -> Result<FieldMap, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(FieldMap::new());
        }
        serde_yaml::from_str(text)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.map)
    }

    pub fn insert_str(&mut self, key: &str, value: &str) {
        self.map
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn insert_int(&mut self, key: &str, value: i64) {
        self.map.insert(key.to_string(), Value::Number(value.into()));
    }

    pub fn insert_str_list(&mut self, key: &str, values: &[String]) {
        let seq = values
            .iter()
            .map(|v| Value::String(v.clone()))
            .collect::<Vec<_>>();
        self.map.insert(key.to_string(), Value::Sequence(seq));
    }

    pub fn insert_str_map(&mut self, key: &str, values: &IndexMap<String, String>) {
        let mut mapping = serde_yaml::Mapping::new();
        for (k, v) in values {
            mapping.insert(Value::String(k.clone()), Value::String(v.clone()));
        }
        self.map.insert(key.to_string(), Value::Mapping(mapping));
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_i64)
    }

    /// String list value; missing key, non-sequence values, and non-string
    /// elements all degrade to an empty/filtered list.
    pub fn get_str_list(&self, key: &str) -> Vec<String> {
        match self.map.get(key).and_then(Value::as_sequence) {
            Some(seq) => seq
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    /// String-to-string mapping value; anything else degrades to empty.
    pub fn get_str_map(&self, key: &str) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        if let Some(mapping) = self.map.get(key).and_then(Value::as_mapping) {
            for (k, v) in mapping {
                if let (Some(k), Some(v)) = (k.as_str(), v.as_str()) {
                    out.insert(k.to_string(), v.to_string());
                }
            }
        }
        out
    }
}

/// A document with a front-matter key/value block and a free-text body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatterDoc {
    pub fields: FieldMap,
    pub body: String,
}

/// Parse a front-matter document. A file that does not open with the
/// delimiter degrades gracefully: empty field block, whole file as body.
pub fn parse_front_matter(text: &str) -> Result<FrontMatterDoc, serde_yaml::Error> {
    let mut lines = text.lines();

    let Some(first) = lines.next() else {
        return Ok(FrontMatterDoc::default());
    };
    if first.trim() != DELIMITER {
        return Ok(FrontMatterDoc {
            fields: FieldMap::new(),
            body: text.to_string(),
        });
    }

    let mut field_lines: Vec<&str> = Vec::new();
    for line in lines.by_ref() {
        if line.trim() == DELIMITER {
            break;
        }
        field_lines.push(line);
    }

    let fields = if field_lines.is_empty() {
        FieldMap::new()
    } else {
        FieldMap::from_yaml(&field_lines.join("\n"))?
    };

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    Ok(FrontMatterDoc { fields, body })
}

/// Serialize a front-matter document. The delimiter pair is always written,
/// even around an empty field block.
pub fn serialize_front_matter(
    fields: &FieldMap,
    body: &str,
) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    if !fields.is_empty() {
        out.push_str(&fields.to_yaml()?);
    }
    out.push_str(DELIMITER);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}
