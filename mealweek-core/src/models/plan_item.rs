use serde::{Deserialize, Serialize};

use super::recipe::Recipe;

/// An entry assigned to a day and meal slot.
///
/// `id` is unique within the containing slot list and is the removal key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlanItem {
    /// Reference to a recipe, with the name as it was when added.
    Recipe {
        id: String,
        #[serde(rename = "recipeId")]
        recipe_id: i64,
        #[serde(rename = "recipeName")]
        recipe_name: String,
    },
    /// Free-text entry ("Leftovers", "Eat out").
    Custom { id: String, text: String },
}

impl PlanItem {
    pub fn recipe_ref(recipe: &Recipe) -> Self {
        PlanItem::Recipe {
            id: format!("recipe-{}", recipe.id),
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
        }
    }

    pub fn custom(id: impl Into<String>, text: impl Into<String>) -> Self {
        PlanItem::Custom {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PlanItem::Recipe { id, .. } | PlanItem::Custom { id, .. } => id,
        }
    }

    /// Text shown for the entry: the recipe name snapshot or the custom text.
    pub fn label(&self) -> &str {
        match self {
            PlanItem::Recipe { recipe_name, .. } => recipe_name,
            PlanItem::Custom { text, .. } => text,
        }
    }

    pub fn recipe_id(&self) -> Option<i64> {
        match self {
            PlanItem::Recipe { recipe_id, .. } => Some(*recipe_id),
            PlanItem::Custom { .. } => None,
        }
    }
}
