//! Relationship resolution
//!
//! Turns declarative relationships into concrete columns, constraints and
//! join tables on a copy of the schema. Resolution runs in two passes:
//!
//! 1. Implicit uniqueness: the declared link field of every one-to-one
//!    relationship becomes unique.
//! 2. Synthesis: link columns and foreign keys are added to the owning table
//!    of each one-to-one and one-to-many relationship, and one join table is
//!    created per distinct many-to-many table pair.
//!
//! Primary keys are looked up on the referenced table. Link columns take the
//! key's type, and a table with no primary key cannot be referenced.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;
use crate::models::{
    Endpoint, Field, ForeignKeyDesign, Relationship, RelationshipKind, ResolvedColumn,
    ResolvedSchema, ResolvedTable, Schema, Table, TableOrigin, TableRef,
};

/// Whether a many-to-many relationship must be declared from both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManyToManyPairing {
    /// A one-sided declaration is enough; a paired one is deduplicated
    #[default]
    Optional,
    /// Every declaration needs an inverse with the endpoints swapped
    Required,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    pub many_to_many_pairing: ManyToManyPairing,
}

impl ResolverOptions {
    pub fn with_pairing(mut self, pairing: ManyToManyPairing) -> Self {
        self.many_to_many_pairing = pairing;
        self
    }
}

/// Name of the join table for two tables, independent of argument order.
///
/// Names are ordered case-insensitively (ties broken by exact comparison)
/// and joined with an underscore, keeping their original casing.
pub fn join_table_name(a: &str, b: &str) -> String {
    let (first, second) = canonical_pair(a, b);
    format!("{}_{}", first, second)
}

fn canonical_pair<'n>(a: &'n str, b: &'n str) -> (&'n str, &'n str) {
    let ordering = a
        .to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b));
    match ordering {
        Ordering::Greater => (b, a),
        _ => (a, b),
    }
}

/// A link column the resolver will place on an owning table
struct LinkColumn {
    name: String,
    data_type: String,
    referenced_column: String,
}

/// Planned foreign key for a one-to-one or one-to-many relationship
struct LinkPlan<'s> {
    relationship: &'s Relationship,
    owner: usize,
    referenced_table: String,
    columns: Vec<LinkColumn>,
}

/// Resolves the relationships of one schema
pub struct RelationshipResolver<'s> {
    schema: &'s Schema,
    options: ResolverOptions,
}

impl<'s> RelationshipResolver<'s> {
    pub fn new(schema: &'s Schema, options: ResolverOptions) -> Self {
        Self { schema, options }
    }

    /// Produce the derived schema. The input schema is never modified.
    pub fn resolve(&self) -> Result<ResolvedSchema, SchemaError> {
        let mut tables: Vec<ResolvedTable> =
            self.schema.tables.iter().map(ResolvedTable::from_table).collect();

        let plans = self
            .schema
            .relationships
            .iter()
            .filter_map(|r| self.plan_link(r).transpose())
            .collect::<Result<Vec<_>, _>>()?;

        // Pass 1: implicit uniqueness
        for plan in plans
            .iter()
            .filter(|p| p.relationship.kind == RelationshipKind::OneToOne && p.columns.len() == 1)
        {
            if let Some(column) = tables[plan.owner].column_mut(&plan.columns[0].name)
                && column.is_declared()
            {
                tracing::trace!(
                    column = %column.name,
                    relationship = %plan.relationship.id,
                    "marking one-to-one link field unique"
                );
                column.derived_unique = true;
            }
        }

        // Pass 2: synthesis
        for plan in &plans {
            Self::apply_link(&mut tables[plan.owner], plan)?;
        }

        let join_tables = self.resolve_join_tables()?;

        tracing::debug!(
            tables = tables.len(),
            links = plans.len(),
            join_tables = join_tables.len(),
            "relationships resolved"
        );

        Ok(ResolvedSchema {
            tables,
            join_tables,
        })
    }

    fn lookup(
        &self,
        relationship: &Relationship,
        reference: &TableRef,
    ) -> Result<(usize, &'s Table), SchemaError> {
        self.schema
            .find_table(reference)
            .ok_or_else(|| SchemaError::UnknownTable {
                relationship: relationship.id.clone(),
                reference: reference.clone(),
            })
    }

    fn primary_key<'t>(
        relationship: &Relationship,
        table: &'t Table,
    ) -> Result<Vec<&'t Field>, SchemaError> {
        let key = table.primary_key_fields();
        if key.is_empty() {
            return Err(SchemaError::MissingPrimaryKey {
                table: table.name.clone(),
                relationship: relationship.id.clone(),
            });
        }
        Ok(key)
    }

    /// Plan the link column(s) of a one-to-one or one-to-many relationship.
    /// Many-to-many relationships have no owning table and yield `None`.
    fn plan_link(
        &self,
        relationship: &'s Relationship,
    ) -> Result<Option<LinkPlan<'s>>, SchemaError> {
        let owning_endpoint = match relationship.kind {
            RelationshipKind::OneToOne => Endpoint::Target,
            RelationshipKind::OneToMany => {
                relationship
                    .many_endpoint()
                    .ok_or_else(|| SchemaError::AmbiguousCardinality {
                        relationship: relationship.id.clone(),
                    })?
            }
            RelationshipKind::ManyToMany => return Ok(None),
        };
        let referenced_endpoint = match owning_endpoint {
            Endpoint::Source => Endpoint::Target,
            Endpoint::Target => Endpoint::Source,
        };

        let (owner, owner_table) = self.lookup(relationship, relationship.endpoint(owning_endpoint))?;
        let (_, referenced) =
            self.lookup(relationship, relationship.endpoint(referenced_endpoint))?;
        let key = Self::primary_key(relationship, referenced)?;

        let columns = if let [key_field] = key.as_slice() {
            let name = match &relationship.field_name {
                Some(name) => name.clone(),
                None if owner_table.field(&key_field.name).is_some() => {
                    format!("{}_{}", referenced.name, key_field.name)
                }
                None => key_field.name.clone(),
            };
            vec![LinkColumn {
                name,
                data_type: key_field.data_type.clone(),
                referenced_column: key_field.name.clone(),
            }]
        } else {
            key.iter()
                .map(|f| LinkColumn {
                    name: format!("{}_{}", referenced.name, f.name),
                    data_type: f.data_type.clone(),
                    referenced_column: f.name.clone(),
                })
                .collect()
        };

        Ok(Some(LinkPlan {
            relationship,
            owner,
            referenced_table: referenced.name.clone(),
            columns,
        }))
    }

    fn apply_link(table: &mut ResolvedTable, plan: &LinkPlan<'_>) -> Result<(), SchemaError> {
        let relationship = plan.relationship;
        let one_to_one = relationship.kind == RelationshipKind::OneToOne;

        for link in &plan.columns {
            match table.column(&link.name) {
                Some(existing) if existing.is_declared() => {
                    if !existing.data_type.trim().eq_ignore_ascii_case(link.data_type.trim()) {
                        return Err(SchemaError::LinkTypeMismatch {
                            relationship: relationship.id.clone(),
                            table: table.name.clone(),
                            column: existing.name.clone(),
                            declared: existing.data_type.clone(),
                            expected: link.data_type.clone(),
                        });
                    }
                }
                Some(_) => {
                    return Err(SchemaError::ColumnConflict {
                        relationship: relationship.id.clone(),
                        table: table.name.clone(),
                        column: link.name.clone(),
                    });
                }
                None => {
                    let mut column =
                        ResolvedColumn::link(&link.name, &link.data_type, &relationship.id);
                    column.derived_unique = one_to_one && plan.columns.len() == 1;
                    table.columns.push(column);
                }
            }
        }

        if one_to_one && plan.columns.len() > 1 {
            table
                .unique_constraints
                .push(plan.columns.iter().map(|c| c.name.clone()).collect());
        }

        let mut fk = ForeignKeyDesign::new()
            .named(format!("fk_{}_{}", table.name, plan.columns[0].name))
            .references(&plan.referenced_table);
        for link in &plan.columns {
            fk = fk
                .column(&link.name)
                .referenced_column(&link.referenced_column);
        }
        table.foreign_keys.push(fk);

        Ok(())
    }

    fn resolve_join_tables(&self) -> Result<Vec<ResolvedTable>, SchemaError> {
        let mut seen_pairs = HashSet::new();
        let mut names: HashMap<String, (usize, usize)> = HashMap::new();
        let mut join_tables = Vec::new();

        for relationship in self
            .schema
            .relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::ManyToMany)
        {
            let (source_index, source) = self.lookup(relationship, &relationship.source_table)?;
            let (target_index, target) = self.lookup(relationship, &relationship.target_table)?;

            if source_index == target_index {
                return Err(SchemaError::SelfReferentialManyToMany {
                    relationship: relationship.id.clone(),
                    table: source.name.clone(),
                });
            }

            if self.options.many_to_many_pairing == ManyToManyPairing::Required
                && !self.has_inverse(relationship, source_index, target_index)
            {
                return Err(SchemaError::MissingInverseRelationship {
                    relationship: relationship.id.clone(),
                    source_table: source.name.clone(),
                    target_table: target.name.clone(),
                });
            }

            let name = join_table_name(&source.name, &target.name);
            let pair = (
                source_index.min(target_index),
                source_index.max(target_index),
            );
            if !seen_pairs.insert(pair) {
                tracing::trace!(
                    join_table = %name,
                    relationship = %relationship.id,
                    "inverse declaration already materialized"
                );
                continue;
            }

            // Distinct pairs such as `a_b`/`c` and `a`/`b_c` can share a name
            let taken_by_pair = names.insert(name.to_lowercase(), pair).is_some();
            let taken_by_table = self
                .schema
                .tables
                .iter()
                .any(|t| t.name.eq_ignore_ascii_case(&name));
            if taken_by_pair || taken_by_table {
                return Err(SchemaError::JoinTableConflict {
                    name,
                    relationship: relationship.id.clone(),
                });
            }

            let (first, second) = if canonical_pair(&source.name, &target.name).0 == source.name {
                (source, target)
            } else {
                (target, source)
            };
            join_tables.push(Self::build_join_table(relationship, name, first, second)?);
        }

        Ok(join_tables)
    }

    fn has_inverse(&self, relationship: &Relationship, source: usize, target: usize) -> bool {
        self.schema.relationships.iter().any(|other| {
            !std::ptr::eq(other, relationship)
                && other.kind == RelationshipKind::ManyToMany
                && self.schema.find_table(&other.source_table).map(|(i, _)| i) == Some(target)
                && self.schema.find_table(&other.target_table).map(|(i, _)| i) == Some(source)
        })
    }

    fn build_join_table(
        relationship: &Relationship,
        name: String,
        first: &Table,
        second: &Table,
    ) -> Result<ResolvedTable, SchemaError> {
        let mut table = ResolvedTable {
            name,
            origin: TableOrigin::JoinTable(relationship.id.clone()),
            columns: Vec::new(),
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
        };

        for participant in [first, second] {
            let key = Self::primary_key(relationship, participant)?;
            let mut fk = ForeignKeyDesign::new()
                .named(format!("fk_{}_{}", table.name, participant.name))
                .references(&participant.name);

            for key_field in key {
                let column_name = format!("{}_{}", participant.name, key_field.name);
                if table.column(&column_name).is_some() {
                    return Err(SchemaError::ColumnConflict {
                        relationship: relationship.id.clone(),
                        table: table.name.clone(),
                        column: column_name,
                    });
                }

                let mut column =
                    ResolvedColumn::link(&column_name, &key_field.data_type, &relationship.id);
                column.primary_key = true;
                column.nullable = false;
                table.columns.push(column);

                fk = fk.column(column_name).referenced_column(&key_field.name);
            }
            table.foreign_keys.push(fk);
        }

        Ok(table)
    }
}
