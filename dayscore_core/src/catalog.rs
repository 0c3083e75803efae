//! Default catalog of tracked categories.
//!
//! This module provides the built-in category set and its daily targets.
//! User configuration can override or extend these.

use crate::types::{Category, TargetRule};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// The complete set of categories known to the engine
#[derive(Clone, Debug)]
pub struct Catalog {
    pub categories: HashMap<String, Category>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with built-in categories
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let mut categories = HashMap::new();

    let builtin = [
        Category {
            id: "vegetables".into(),
            name: "Vegetables".into(),
            enabled: true,
            sort_order: 10,
            unit: "servings".into(),
            rule: TargetRule::AtLeast { target: 3.0 },
        },
        Category {
            id: "fruit".into(),
            name: "Fruit".into(),
            enabled: true,
            sort_order: 20,
            unit: "servings".into(),
            rule: TargetRule::AtLeast { target: 2.0 },
        },
        Category {
            id: "water".into(),
            name: "Water".into(),
            enabled: true,
            sort_order: 30,
            unit: "glasses".into(),
            rule: TargetRule::AtLeast { target: 6.0 },
        },
        Category {
            id: "protein".into(),
            name: "Protein".into(),
            enabled: true,
            sort_order: 40,
            unit: "servings".into(),
            rule: TargetRule::Range { min: 2.0, max: 4.0 },
        },
        Category {
            id: "treats".into(),
            name: "Treats".into(),
            enabled: true,
            sort_order: 50,
            unit: "servings".into(),
            rule: TargetRule::AtMost { target: 1.0 },
        },
        Category {
            id: "sports".into(),
            name: "Sports".into(),
            enabled: true,
            sort_order: 60,
            unit: "minutes".into(),
            rule: TargetRule::AtLeast { target: 30.0 },
        },
    ];

    for category in builtin {
        categories.insert(category.id.clone(), category);
    }

    Catalog { categories }
}

impl Catalog {
    /// Catalog with user-defined categories layered over the built-ins.
    ///
    /// A custom category with a built-in id replaces the built-in entry.
    pub fn with_overrides(&self, custom: &[Category]) -> Catalog {
        let mut categories = self.categories.clone();
        for category in custom {
            categories.insert(category.id.clone(), category.clone());
        }
        Catalog { categories }
    }

    /// Enabled categories in display order (sort_order, then id)
    pub fn enabled_categories(&self) -> Vec<&Category> {
        let mut enabled: Vec<_> = self.categories.values().filter(|c| c.enabled).collect();
        enabled.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
        enabled
    }

    /// Validate all categories, collecting human-readable errors
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, category) in &self.categories {
            if id != &category.id {
                errors.push(format!(
                    "Category keyed as '{}' but declares id '{}'",
                    id, category.id
                ));
            }
            if category.name.is_empty() {
                errors.push(format!("Category '{}': empty display name", id));
            }
            if category.unit.is_empty() {
                errors.push(format!("Category '{}': empty unit name", id));
            }
            if let Err(e) = category.rule.validate() {
                errors.push(format!("Category '{}': {}", id, e));
            }
        }

        errors
    }
}
