//! Foreign key design model

/// A foreign-key constraint on a resolved table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyDesign {
    /// Constraint name (optional)
    pub name: Option<String>,
    /// Local columns
    pub columns: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced columns
    pub referenced_columns: Vec<String>,
}

impl ForeignKeyDesign {
    /// Create a new empty foreign key design
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set constraint name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: add local column
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Builder: set referenced table
    pub fn references(mut self, table: impl Into<String>) -> Self {
        self.referenced_table = table.into();
        self
    }

    /// Builder: add referenced column
    pub fn referenced_column(mut self, name: impl Into<String>) -> Self {
        self.referenced_columns.push(name.into());
        self
    }
}
