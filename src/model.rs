use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of numbered ingredient/measure pairs in a catalog record
pub const INGREDIENT_SLOTS: usize = 20;

/// One numbered ingredient/measure pair of a raw record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

/// A catalog record as the API returns it.
///
/// The numbered `strIngredientN` / `strMeasureN` fields are decoded once into
/// [`IngredientSlot`]s so the rest of the crate never looks fields up by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawRecipeRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    slots: [IngredientSlot; INGREDIENT_SLOTS],
}

impl RawRecipeRecord {
    /// Slot by its 1-based catalog number
    pub fn slot(&self, number: usize) -> Option<&IngredientSlot> {
        number
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
    }

    /// Replace slot `number` (1-based); out-of-range numbers are ignored
    pub fn set_slot(&mut self, number: usize, ingredient: &str, measure: &str) {
        if let Some(slot) = number
            .checked_sub(1)
            .and_then(|index| self.slots.get_mut(index))
        {
            slot.ingredient = Some(ingredient.to_string());
            slot.measure = Some(measure.to_string());
        }
    }

    /// All slots paired with their 1-based number, in catalog order
    pub fn slots(&self) -> impl Iterator<Item = (usize, &IngredientSlot)> {
        self.slots.iter().enumerate().map(|(i, slot)| (i + 1, slot))
    }
}

fn take_text(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<Map<String, Value>> for RawRecipeRecord {
    fn from(mut map: Map<String, Value>) -> Self {
        let slots = std::array::from_fn(|index| {
            let number = index + 1;
            IngredientSlot {
                ingredient: take_text(&mut map, &format!("strIngredient{number}")),
                measure: take_text(&mut map, &format!("strMeasure{number}")),
            }
        });

        RawRecipeRecord {
            id: take_text(&mut map, "idMeal"),
            name: take_text(&mut map, "strMeal"),
            category: take_text(&mut map, "strCategory"),
            area: take_text(&mut map, "strArea"),
            instructions: take_text(&mut map, "strInstructions"),
            thumbnail: take_text(&mut map, "strMealThumb"),
            tags: take_text(&mut map, "strTags"),
            youtube: take_text(&mut map, "strYoutube"),
            source: take_text(&mut map, "strSource"),
            slots,
        }
    }
}

/// Envelope used by every recipe endpoint; `meals` is `null` when nothing matched
#[derive(Debug, Deserialize, Default)]
pub struct MealsResponse {
    #[serde(default)]
    pub meals: Option<Vec<RawRecipeRecord>>,
}

impl MealsResponse {
    pub fn into_records(self) -> Vec<RawRecipeRecord> {
        self.meals.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryEntry {
    #[serde(rename = "strCategory")]
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub meals: Option<Vec<CategoryEntry>>,
}

/// Summary view used for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCard {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A single ingredient line; an empty measure means "to taste"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

/// Full recipe used by the detail view and the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub area: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Recipe {
    pub fn card(&self) -> RecipeCard {
        RecipeCard {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            category: self.category.clone(),
            area: self.area.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Instruction text split into non-blank paragraphs
    pub fn instruction_paragraphs(&self) -> Vec<&str> {
        self.instructions
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

/// One shopping-list entry merged across recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedIngredient {
    pub name: String,
    pub measures: Vec<String>,
    pub summary: String,
}
