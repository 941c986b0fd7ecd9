//! Raw catalogue record -> canonical [`Block`].
//!
//! Records are walked field by field rather than deserialized in one go, so
//! a type mismatch reports exactly which record and which field are wrong.

use std::collections::BTreeMap;

use blockgen_registry::{Block, BlockId, StateId};
use serde_json::{Map, Value};

use crate::error::{RecordRef, SchemaError};

/// Short name for the JSON type of `value`, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalize every record, stopping at the first malformed one.
pub fn normalize_all(records: &[Value]) -> Result<Vec<Block>, SchemaError> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize(index, raw))
        .collect()
}

/// Normalize the record at position `index` of the catalogue.
///
/// `drops` and `harvestTools` may be absent, `null` or empty; all three
/// produce an empty container. Every other field is required.
pub fn normalize(index: usize, raw: &Value) -> Result<Block, SchemaError> {
    let Value::Object(obj) = raw else {
        return Err(SchemaError::NotAnObject {
            record: RecordRef { index, name: None },
            found: json_kind(raw),
        });
    };

    let fields = Fields {
        obj,
        record: RecordRef {
            index,
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
        },
    };

    Ok(Block {
        id: BlockId(fields.u32("id")?),
        display_name: fields.string("displayName")?,
        name: fields.string("name")?,
        hardness: fields.hardness("hardness")?,
        diggable: fields.bool("diggable")?,
        drop_ids: fields.drops("drops")?,
        needs_tools: fields.tools("harvestTools")?,
        min_state_id: StateId(fields.u32("minStateId")?),
        max_state_id: StateId(fields.u32("maxStateId")?),
        transparent: fields.bool("transparent")?,
        filter_light_level: fields.u8("filterLight")?,
        emit_light_level: fields.u8("emitLight")?,
    })
}

struct Fields<'a> {
    obj: &'a Map<String, Value>,
    record: RecordRef,
}

impl Fields<'_> {
    fn error(&self, field: &'static str, problem: impl Into<String>) -> SchemaError {
        SchemaError::Field {
            record: self.record.clone(),
            field,
            problem: problem.into(),
        }
    }

    fn required(&self, field: &'static str) -> Result<&Value, SchemaError> {
        self.obj.get(field).ok_or_else(|| self.error(field, "is missing"))
    }

    fn mismatch(&self, field: &'static str, expected: &str, found: &Value) -> SchemaError {
        self.error(field, format!("must be {}, found {}", expected, json_kind(found)))
    }

    fn u32(&self, field: &'static str) -> Result<u32, SchemaError> {
        let value = self.required(field)?;
        as_u32(value).ok_or_else(|| self.mismatch(field, "an integer in 0..=4294967295", value))
    }

    fn u8(&self, field: &'static str) -> Result<u8, SchemaError> {
        let value = self.required(field)?;
        value
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| self.mismatch(field, "an integer in 0..=255", value))
    }

    fn bool(&self, field: &'static str) -> Result<bool, SchemaError> {
        let value = self.required(field)?;
        value.as_bool().ok_or_else(|| self.mismatch(field, "a boolean", value))
    }

    fn string(&self, field: &'static str) -> Result<String, SchemaError> {
        let value = self.required(field)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(field, "a string", value))
    }

    /// Upstream marks unbreakable blocks with a `null` hardness.
    fn hardness(&self, field: &'static str) -> Result<f64, SchemaError> {
        let value = self.required(field)?;
        if value.is_null() {
            return Ok(0.0);
        }
        match value.as_f64() {
            Some(h) if h >= 0.0 => Ok(h),
            Some(h) => Err(self.error(field, format!("must be non-negative, found {}", h))),
            None => Err(self.mismatch(field, "a number", value)),
        }
    }

    fn drops(&self, field: &'static str) -> Result<Vec<u32>, SchemaError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    as_u32(item).ok_or_else(|| {
                        self.error(field, format!("element {} must be an item id, found {}", i, json_kind(item)))
                    })
                })
                .collect(),
            Some(other) => Err(self.mismatch(field, "an array", other)),
        }
    }

    fn tools(&self, field: &'static str) -> Result<BTreeMap<u32, bool>, SchemaError> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Ok(BTreeMap::new()),
            Some(Value::Object(map)) => {
                let mut tools = BTreeMap::new();
                for (key, value) in map {
                    let tool: u32 = key
                        .parse()
                        .map_err(|_| self.error(field, format!("key {:?} is not a tool id", key)))?;
                    let needed = value.as_bool().ok_or_else(|| {
                        self.error(field, format!("value for tool {} must be a boolean, found {}", tool, json_kind(value)))
                    })?;
                    // "7" and "07" are the same tool.
                    if tools.insert(tool, needed).is_some() {
                        return Err(self.error(field, format!("lists tool {} more than once", tool)));
                    }
                }
                Ok(tools)
            }
            Some(other) => Err(self.mismatch(field, "an object", other)),
        }
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}
