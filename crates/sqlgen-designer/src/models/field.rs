//! Field model

use serde::{Deserialize, Serialize};

/// A typed column as declared by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Column name
    pub name: String,
    /// Opaque SQL type (e.g., "BIGINT", "VARCHAR(255)")
    #[serde(rename = "type")]
    pub data_type: String,
    /// Is this field part of the primary key?
    #[serde(default, alias = "isPrimaryKey")]
    pub primary_key: bool,
    /// Is this field auto-incrementing?
    #[serde(default, alias = "isAutoIncrement")]
    pub auto_increment: bool,
    /// Is this field unique?
    #[serde(default, alias = "isUnique")]
    pub unique: bool,
    /// Whether NULL values are allowed
    #[serde(default = "default_nullable", alias = "isNullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl Field {
    /// Create a nullable TEXT field with a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: "TEXT".to_string(),
            primary_key: false,
            auto_increment: false,
            unique: false,
            nullable: true,
        }
    }

    /// Builder: set data type
    pub fn data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    /// Builder: set as BIGINT
    pub fn bigint(self) -> Self {
        self.data_type("BIGINT")
    }

    /// Builder: set as VARCHAR of the given length
    pub fn varchar(self, length: u32) -> Self {
        self.data_type(format!("VARCHAR({})", length))
    }

    /// Builder: set as primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Builder: set as not null
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Builder: set as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Builder: set as auto increment
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}
