use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One ingredient of a recipe
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Display color of the ingredient layer
    pub color: String,
    /// Ingredient name
    pub name: String,
    /// Relative proportion, at least 1
    pub parts: u32,
}

/// Ingredient as shown on the public menu, without its name
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// A recipe as accepted in request bodies: either one ingredient or a list of them
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    /// List form of the recipe, without validation
    pub fn normalize(self) -> Vec<Ingredient> {
        match self {
            Self::Many(recipe) => recipe,
            Self::One(ingredient) => vec![ingredient],
        }
    }

    /// Normalizes to the stored list form and validates every entry
    pub fn into_recipe(self) -> Result<Vec<Ingredient>, String> {
        let recipe = self.normalize();
        if let Some(ingredient) = recipe.iter().find(|i| i.parts == 0) {
            return Err(format!(
                "Ingredient '{}' must have at least one part",
                ingredient.name
            ));
        }
        Ok(recipe)
    }
}

/// A persisted drink (long form)
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public representation of a drink
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|ingredient| IngredientShort {
                    color: ingredient.color.clone(),
                    parts: ingredient.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> Drink {
        self.clone()
    }
}

/// A drink that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl NewDrink {
    /// Validates a title and normalizes a recipe before anything is persisted
    pub fn new(title: String, recipe: RecipeInput) -> Result<Self, String> {
        Ok(Self {
            title: validate_title(title)?,
            recipe: recipe.into_recipe()?,
        })
    }
}

pub fn validate_title(title: String) -> Result<String, String> {
    if title.trim().is_empty() {
        return Err("Drink title must not be empty".to_string());
    }
    Ok(title)
}

/// Request body for `POST /drinks`
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct CreateDrink {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Distinguishes a field sent as `null` (`Some(None)`) from an absent one (`None`)
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for `PATCH /drinks/{id}`; absent fields are left unchanged
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Default)]
pub struct UpdateDrink {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<RecipeInput>)]
    pub recipe: Option<Option<RecipeInput>>,
}

impl UpdateDrink {
    /// Applies every field present in the body; an explicit `null` is rejected
    pub fn apply(self, drink: &mut Drink) -> Result<(), String> {
        match self.title {
            Some(Some(title)) => drink.title = validate_title(title)?,
            Some(None) => return Err("Drink title must not be null".to_string()),
            None => {}
        }
        match self.recipe {
            Some(Some(recipe)) => drink.recipe = recipe.into_recipe()?,
            Some(None) => return Err("Drink recipe must not be null".to_string()),
            None => {}
        }
        Ok(())
    }
}

/// Response body listing drinks in their public form
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DrinkListResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// Response body listing drinks with full recipes
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DrinkDetailsResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// Response body for `DELETE /drinks/{id}`
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: i64,
}
