use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::lenient;

/// Raw body of `POST /generate-item`. Every field is optional and loosely
/// typed; `services::weapon::WeaponContext` normalizes it.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct WeaponRequest {
    #[serde(default)]
    pub owned_weapons: Option<Value>,
    #[serde(default)]
    pub player_level: Option<Value>,
    #[serde(default)]
    pub preferred_type: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "Label")]
pub enum WeaponKind {
    #[default]
    Weapon,
    Ranged,
    Ability,
}

impl From<Label> for WeaponKind {
    fn from(label: Label) -> Self {
        match label.0.as_deref() {
            Some("ranged" | "bow" | "gun" | "projectile") => Self::Ranged,
            Some("ability" | "spell" | "magic" | "skill") => Self::Ability,
            _ => Self::Weapon,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", from = "Label")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl From<Label> for Rarity {
    fn from(label: Label) -> Self {
        match label.0.as_deref() {
            Some("uncommon") => Self::Uncommon,
            Some("rare") => Self::Rare,
            Some("epic") => Self::Epic,
            Some("legendary" | "mythic") => Self::Legendary,
            _ => Self::Common,
        }
    }
}

/// A free-form label from a model reply; unknown values map to the default
/// variant rather than failing.
#[derive(Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct Label(#[serde(deserialize_with = "lenient::label")] Option<String>);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeaponDescriptor {
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub id: String,
    pub name: String,
    #[serde(default = "default_icon", deserialize_with = "icon_or_default")]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub kind: WeaponKind,
    pub damage: u32,
    pub cooldown: u32,
    pub energy: u32,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub desc: String,
    pub price: u32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

fn icon_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|icon| !icon.trim().is_empty())
        .unwrap_or_else(default_icon))
}

pub(crate) fn default_icon() -> String {
    "🗡️".to_string()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeaponResponse {
    pub success: bool,
    pub weapon: WeaponDescriptor,
}
