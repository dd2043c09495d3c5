//! Shopping list built from the ingredients of several recipes.

use std::collections::HashMap;

use feruca::Collator;

use crate::model::{CombinedIngredient, Recipe};

/// Merge ingredients across `recipes` into one sorted shopping list.
///
/// Names are merged case-insensitively. Every non-empty measure is kept in
/// the order it was seen, including exact repeats.
pub fn combine(recipes: &[Recipe]) -> Vec<CombinedIngredient> {
    let mut measures_by_name: HashMap<String, Vec<String>> = HashMap::new();

    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            let measures = measures_by_name
                .entry(ingredient.name.to_lowercase())
                .or_default();
            if !ingredient.measure.is_empty() {
                measures.push(ingredient.measure.clone());
            }
        }
    }

    let mut combined: Vec<CombinedIngredient> = measures_by_name
        .into_iter()
        .map(|(name, measures)| {
            let summary = summarize(&measures);
            CombinedIngredient {
                name: capitalize_first(&name),
                measures,
                summary,
            }
        })
        .collect();

    // Unicode collation: accents and case only break ties between base letters
    let mut collator = Collator::default();
    combined.sort_by(|a, b| {
        collator
            .collate(&a.name, &b.name)
            .then_with(|| a.name.cmp(&b.name))
    });
    combined
}

fn summarize(measures: &[String]) -> String {
    match measures {
        [] => String::new(),
        [only] => only.clone(),
        many => format!("{} times", many.len()),
    }
}

fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Plain-text list suitable for the clipboard: `• Name - measure` per line
pub fn shopping_list_text(items: &[CombinedIngredient]) -> String {
    items
        .iter()
        .map(|item| match item.measures.first() {
            Some(measure) => format!("• {} - {}", item.name, measure),
            None => format!("• {}", item.name),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
