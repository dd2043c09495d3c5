//! Turns raw catalog records into [`RecipeCard`] and [`Recipe`] values.

use crate::error::{BrowserError, Result};
use crate::model::{Ingredient, RawRecipeRecord, Recipe, RecipeCard};

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or(BrowserError::MalformedRecordError { field })
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn split_tags(tags: &Option<String>) -> Option<Vec<String>> {
    tags.as_deref()
        .filter(|tags| !tags.is_empty())
        .map(|tags| tags.split(',').map(|tag| tag.trim().to_string()).collect())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

/// Summary view of a record.
///
/// Fails with [`BrowserError::MalformedRecordError`] when the id or name is missing.
pub fn to_card(raw: &RawRecipeRecord) -> Result<RecipeCard> {
    Ok(RecipeCard {
        id: required(&raw.id, "idMeal")?.to_string(),
        name: required(&raw.name, "strMeal")?.to_string(),
        image: text_or_empty(&raw.thumbnail),
        category: text_or_empty(&raw.category),
        area: text_or_empty(&raw.area),
        tags: split_tags(&raw.tags),
    })
}

/// Detail view of a record, including its ingredient list
pub fn to_detail(raw: &RawRecipeRecord) -> Result<Recipe> {
    let card = to_card(raw)?;

    Ok(Recipe {
        id: card.id,
        name: card.name,
        image: card.image,
        category: card.category,
        area: card.area,
        tags: card.tags,
        instructions: text_or_empty(&raw.instructions),
        ingredients: extract_ingredients(raw),
        youtube: non_empty(&raw.youtube),
        source: non_empty(&raw.source),
    })
}

/// Ingredients in slot order; slots with a blank name are skipped
pub fn extract_ingredients(raw: &RawRecipeRecord) -> Vec<Ingredient> {
    raw.slots()
        .filter_map(|(_, slot)| {
            let name = slot.ingredient.as_deref()?.trim();
            if name.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                measure: slot.measure.as_deref().unwrap_or("").trim().to_string(),
            })
        })
        .collect()
}

/// Cards for every record, failing on the first malformed one
pub fn to_cards(records: &[RawRecipeRecord]) -> Result<Vec<RecipeCard>> {
    records.iter().map(to_card).collect()
}
