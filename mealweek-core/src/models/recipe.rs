use serde::{Deserialize, Serialize};
use std::fmt;

/// A recipe in the user's collection.
///
/// Plan entries reference recipes by `id` and keep a snapshot of the name, so
/// a recipe can be edited or deleted without touching existing plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Free text, one ingredient per line.
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
}

impl Recipe {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ingredients: String::new(),
            instructions: String::new(),
        }
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Builds a recipe from a draft under the given id.
    pub fn from_draft(id: i64, draft: RecipeDraft) -> Self {
        Self {
            id,
            name: draft.name,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
        }
    }

    /// Non-empty, trimmed ingredient lines.
    pub fn ingredient_lines(&self) -> Vec<&str> {
        self.ingredients
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Replaces the fields present in `update`, keeping the rest.
    pub fn apply(&mut self, update: RecipeUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(instructions) = update.instructions {
            self.instructions = instructions;
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;

        writeln!(f, "\nIngredients:")?;
        let lines = self.ingredient_lines();
        if lines.is_empty() {
            writeln!(f, "  No ingredients listed.")?;
        } else {
            for line in lines {
                writeln!(f, "  - {}", line)?;
            }
        }

        writeln!(f, "\nInstructions:")?;
        if self.instructions.trim().is_empty() {
            writeln!(f, "  No instructions provided.")?;
        } else {
            writeln!(f, "{}", self.instructions)?;
        }

        Ok(())
    }
}

/// Recipe fields without an id, as produced by a form or an importer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// Partial recipe update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
}

impl RecipeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.ingredients.is_none() && self.instructions.is_none()
    }
}

/// Starter collection used when no recipes have been stored yet.
pub fn default_recipes() -> Vec<Recipe> {
    vec![
        Recipe::new(1, "Spaghetti Carbonara")
            .with_instructions("A classic Roman pasta dish."),
        Recipe::new(2, "Chicken Curry").with_instructions("Creamy and flavorful chicken curry."),
        Recipe::new(3, "Tofu Scramble").with_instructions("A delicious vegan breakfast option."),
        Recipe::new(4, "Lentil Soup").with_instructions("Hearty and healthy lentil soup."),
    ]
}
