use clap::{Args, Subcommand};
use std::io::{self, Write};

use mealweek_core::{Clock, KeyValueStore, PlanStore, Recipe, RecipeDraft, RecipeUpdate};

use super::OutputFormat;
use crate::render::render_recipe_list;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Add a recipe
    Add {
        /// Name of the recipe
        name: String,

        /// Ingredient line (can be repeated)
        #[arg(long = "ingredient", short = 'i', value_name = "INGREDIENT")]
        ingredients: Vec<String>,

        /// Cooking instructions
        #[arg(long)]
        instructions: Option<String>,
    },

    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing recipe
    Update {
        /// Recipe ID or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replace the ingredients (can be repeated)
        #[arg(long = "ingredient", short = 'i', value_name = "INGREDIENT")]
        ingredients: Vec<String>,

        /// New instructions
        #[arg(long)]
        instructions: Option<String>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl RecipeCommand {
    pub fn run<S: KeyValueStore, C: Clock>(
        &self,
        store: &mut PlanStore<S, C>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::Add {
                name,
                ingredients,
                instructions,
            } => {
                let draft = RecipeDraft::new(name)
                    .with_ingredients(ingredients.join("\n"))
                    .with_instructions(instructions.clone().unwrap_or_default());

                let id = store.add_recipe(draft);
                println!("Added recipe {} ({})", name, id);
                Ok(())
            }

            RecipeSubcommand::List { format } => {
                let recipes = store.recipes();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(recipes)?);
                    }
                    OutputFormat::Text => {
                        if recipes.is_empty() {
                            println!("No recipes found");
                            return Ok(());
                        }
                        print!("{}", render_recipe_list(recipes));
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { identifier, format } => {
                let recipe = resolve_recipe(store, identifier)?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&recipe)?),
                    OutputFormat::Text => print!("{}", recipe),
                }
                Ok(())
            }

            RecipeSubcommand::Update {
                identifier,
                name,
                ingredients,
                instructions,
            } => {
                let update = RecipeUpdate {
                    name: name.clone(),
                    ingredients: (!ingredients.is_empty()).then(|| ingredients.join("\n")),
                    instructions: instructions.clone(),
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let recipe = resolve_recipe(store, identifier)?;
                if store.update_recipe(recipe.id, update) {
                    println!("Updated recipe:");
                    if let Some(updated) = store.recipe(recipe.id) {
                        print!("{}", updated);
                    }
                } else {
                    println!("No changes to '{}'", recipe.name);
                }
                Ok(())
            }

            RecipeSubcommand::Delete { identifier, force } => {
                let recipe = resolve_recipe(store, identifier)?;

                if !force {
                    print!("Delete recipe '{}'? [y/N] ", recipe.name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                store.delete_recipe(recipe.id);
                println!("Deleted recipe: {}", recipe.name);
                Ok(())
            }
        }
    }
}

/// Looks a recipe up by numeric id, then by name.
pub fn resolve_recipe<S: KeyValueStore, C: Clock>(
    store: &PlanStore<S, C>,
    identifier: &str,
) -> Result<Recipe, String> {
    let by_id = identifier
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| store.recipe(id));

    by_id
        .or_else(|| store.find_recipe_by_name(identifier))
        .cloned()
        .ok_or_else(|| format!("Recipe not found: {}", identifier))
}
